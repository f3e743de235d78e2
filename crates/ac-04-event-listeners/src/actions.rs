use ac_03_contract_facades::receipts::ActionReceipt;
use shared_types::Action;

use crate::errors::ListenerError;
use crate::listener::{Listening, Payload};

listener! {
    /// Action lifecycle: requested, then authorized or denied.
    ActionsListener => "Actions"
}

impl ActionsListener {
    pub async fn start_created_pending_action_listening<H>(
        &self,
        handler: H,
    ) -> Result<Listening, ListenerError>
    where
        H: FnMut(Action) + Send + 'static,
    {
        self.base
            .start_listening(
                "createdPendingAction",
                Payload::Nested("action"),
                ActionReceipt::inflate_pending,
                handler,
            )
            .await
    }

    pub async fn start_created_authorized_action_listening<H>(
        &self,
        handler: H,
    ) -> Result<Listening, ListenerError>
    where
        H: FnMut(Action) + Send + 'static,
    {
        self.base
            .start_listening(
                "createdAuthorizedAction",
                Payload::Nested("action"),
                ActionReceipt::inflate_authorized,
                handler,
            )
            .await
    }

    pub async fn start_created_denied_action_listening<H>(
        &self,
        handler: H,
    ) -> Result<Listening, ListenerError>
    where
        H: FnMut(Action) + Send + 'static,
    {
        self.base
            .start_listening(
                "createdDeniedAction",
                Payload::Nested("action"),
                ActionReceipt::inflate_denied,
                handler,
            )
            .await
    }
}
