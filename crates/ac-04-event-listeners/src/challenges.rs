use ac_03_contract_facades::receipts::{ChallengeReceipt, IssuedChallengeReceipt};
use shared_types::{Challenge, IssuedChallenge};

use crate::errors::ListenerError;
use crate::listener::{Listening, Payload};

listener! {
    /// Challenge lifecycle: emitted, then authorized or denied.
    ChallengesListener => "Challenges"
}

impl ChallengesListener {
    pub async fn start_created_pending_challenge_listening<H>(
        &self,
        handler: H,
    ) -> Result<Listening, ListenerError>
    where
        H: FnMut(Challenge) + Send + 'static,
    {
        self.base
            .start_listening(
                "createdPendingChallenge",
                Payload::Nested("challenge"),
                ChallengeReceipt::inflate_pending,
                handler,
            )
            .await
    }

    pub async fn start_created_authorized_challenge_listening<H>(
        &self,
        handler: H,
    ) -> Result<Listening, ListenerError>
    where
        H: FnMut(Challenge) + Send + 'static,
    {
        self.base
            .start_listening(
                "createdAuthorizedChallenge",
                Payload::Nested("challenge"),
                ChallengeReceipt::inflate_authorized,
                handler,
            )
            .await
    }

    pub async fn start_created_denied_challenge_listening<H>(
        &self,
        handler: H,
    ) -> Result<Listening, ListenerError>
    where
        H: FnMut(Challenge) + Send + 'static,
    {
        self.base
            .start_listening(
                "createdDeniedChallenge",
                Payload::Nested("challenge"),
                ChallengeReceipt::inflate_denied,
                handler,
            )
            .await
    }
}

listener! {
    /// Challenges pushed to devices; the payload is the event's own arguments.
    ChallengerListener => "Challenger"
}

impl ChallengerListener {
    pub async fn start_issue_challenge_listening<H>(&self, handler: H) -> Result<Listening, ListenerError>
    where
        H: FnMut(IssuedChallenge) + Send + 'static,
    {
        self.base
            .start_listening(
                "issueChallenge",
                Payload::Flat,
                IssuedChallengeReceipt::inflate,
                handler,
            )
            .await
    }
}
