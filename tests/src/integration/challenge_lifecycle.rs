//! # Challenge Lifecycle
//!
//! ```text
//! createPending ──► createdPendingChallenge + issueChallenge
//!       │
//!       ├── authorize ──► createdAuthorizedChallenge
//!       ├── deny ───────► createdDeniedChallenge
//!       └── remove ─────► gone from every bucket
//! ```
//!
//! Reads and events must agree on the same record at every step.

#[cfg(test)]
mod tests {
    use ac_02_contract_gateway::Facade;
    use ac_03_contract_facades::Challenges;
    use ac_04_event_listeners::{ChallengerListener, ChallengesListener};
    use shared_types::{ActionId, Challenge, ChallengeId, IssuedChallenge, Timestamp};
    use tokio::sync::mpsc;

    use crate::chain::MockChain;
    use crate::fixtures::*;

    #[tokio::test]
    async fn test_pending_then_authorized_then_removed() {
        let chain = MockChain::new();
        let env = environment(&chain);
        let deployment = deploy(&env).await;
        let listener = ChallengesListener::at(&env, deployment.challenges.address().clone()).unwrap();

        let (pending_tx, mut pending_rx) = mpsc::unbounded_channel();
        let (authorized_tx, mut authorized_rx) = mpsc::unbounded_channel();
        let _pending = listener
            .start_created_pending_challenge_listening(move |challenge: Challenge| {
                let _ = pending_tx.send(challenge);
            })
            .await
            .unwrap();
        let _authorized = listener
            .start_created_authorized_challenge_listening(move |challenge: Challenge| {
                let _ = authorized_tx.send(challenge);
            })
            .await
            .unwrap();

        let emitted_at = chain.now();
        deployment.create_pending_challenge().await;

        let id = deployment.challenges.last_challenge_id().await.unwrap();
        assert_eq!(id, ChallengeId::from(1u64));

        let announced = received(&mut pending_rx).await;
        let stored = deployment.challenges.get_pending(id).await.unwrap();
        assert_eq!(announced, stored);
        assert!(stored.status().is_pending());
        assert_eq!(stored.details().agent_id, agent_id());
        assert_eq!(stored.details().title, title());
        assert_eq!(stored.details().emit_date, Timestamp::of(emitted_at));

        let authorized_at = chain.now();
        deployment.challenges.authorize(id).await.unwrap();

        let announced = received(&mut authorized_rx).await;
        let stored = deployment.challenges.get_authorized(id).await.unwrap();
        assert_eq!(announced, stored);
        assert_eq!(stored.authorized_date(), Some(Timestamp::of(authorized_at)));
        assert!(deployment
            .challenges
            .get_pending(id)
            .await
            .unwrap_err()
            .is_not_found());

        deployment.challenges.remove(id).await.unwrap();

        let error = deployment.challenges.get_authorized(id).await.unwrap_err();
        assert!(error.is_not_found());
        assert!(error
            .to_string()
            .ends_with("Challenges getAuthorized ( 1 ) failed to return a value."));
    }

    #[tokio::test]
    async fn test_denied_challenge_carries_its_date() {
        let chain = MockChain::new();
        let env = environment(&chain);
        let deployment = deploy(&env).await;
        let listener = ChallengesListener::at(&env, deployment.challenges.address().clone()).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _denied = listener
            .start_created_denied_challenge_listening(move |challenge: Challenge| {
                let _ = tx.send(challenge);
            })
            .await
            .unwrap();

        deployment.create_pending_challenge().await;
        let denied_at = chain.now();
        deployment.challenges.deny(ChallengeId::from(1u64)).await.unwrap();

        let challenge = received(&mut rx).await;
        assert_eq!(challenge.denied_date(), Some(Timestamp::of(denied_at)));
        assert_eq!(challenge.authorized_date(), None);
        assert_eq!(
            deployment.challenges.get_denied(ChallengeId::from(1u64)).await.unwrap(),
            challenge
        );
        assert!(deployment
            .challenges
            .get_authorized(ChallengeId::from(1u64))
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_zero_id_is_a_revert_not_an_absence() {
        let chain = MockChain::new();
        let deployment = deploy(&environment(&chain)).await;

        let uninitialized = deployment
            .challenges
            .get_pending(ChallengeId::from(0u64))
            .await
            .unwrap_err();
        assert!(!uninitialized.is_not_found());
        assert!(uninitialized
            .to_string()
            .contains("revert Uninitialized challengeId"));

        let missing = deployment
            .challenges
            .get_pending(ChallengeId::from(100u64))
            .await
            .unwrap_err();
        assert!(missing.is_not_found());
        assert!(missing
            .to_string()
            .ends_with("Challenges getPending ( 100 ) failed to return a value."));
    }

    #[tokio::test]
    async fn test_resolving_twice_is_refused() {
        let chain = MockChain::new();
        let deployment = deploy(&environment(&chain)).await;
        deployment.create_pending_challenge().await;
        deployment.challenges.authorize(ChallengeId::from(1u64)).await.unwrap();

        let error = deployment
            .challenges
            .deny(ChallengeId::from(1u64))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("revert Expecting a pending challenge"));
        assert!(deployment
            .challenges
            .get_authorized(ChallengeId::from(1u64))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_issued_challenge_reaches_challenger_listeners() {
        let chain = MockChain::new();
        let env = environment(&chain);
        let deployment = deploy(&env).await;
        let listener = ChallengerListener::at(&env, deployment.challenger.address().clone()).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _issued = listener
            .start_issue_challenge_listening(move |issued: IssuedChallenge| {
                let _ = tx.send(issued);
            })
            .await
            .unwrap();

        deployment.create_pending_challenge().await;

        let issued = received(&mut rx).await;
        assert_eq!(issued.organization_id, organization_id());
        assert_eq!(issued.challenge_id, ChallengeId::from(1u64));
        assert_eq!(issued.device_id, device_id());
        assert_eq!(issued.device_token, token());
        assert_eq!(issued.message, message());
    }

    #[tokio::test]
    async fn test_action_tracks_its_challenges() {
        let chain = MockChain::new();
        let deployment = deploy(&environment(&chain)).await;
        let actions = &deployment.actions;

        actions.create_pending(policy_id()).await.unwrap();
        let action = actions.last_action_id().await.unwrap();
        assert_eq!(action, ActionId::from(1u64));

        for _ in 0..2 {
            actions
                .create_pending_challenge(
                    organization_id(),
                    policy_id(),
                    action,
                    agent_id(),
                    device_id(),
                    &token(),
                    &title(),
                    &message(),
                )
                .await
                .unwrap();
        }
        let pending = actions.get_pending(action).await.unwrap();
        assert_eq!(
            pending.details().pending_challenges,
            vec![ChallengeId::from(1u64), ChallengeId::from(2u64)]
        );

        actions
            .authorize_pending_challenge(action, ChallengeId::from(1u64))
            .await
            .unwrap();
        actions
            .deny_pending_challenge(action, ChallengeId::from(2u64))
            .await
            .unwrap();

        let resolved = actions.get_pending(action).await.unwrap();
        assert!(resolved.details().pending_challenges.is_empty());
        assert_eq!(
            resolved.details().authorized_challenges,
            vec![ChallengeId::from(1u64)]
        );
        assert_eq!(resolved.details().denied_challenges, vec![ChallengeId::from(2u64)]);
        assert!(deployment
            .challenges
            .get_authorized(ChallengeId::from(1u64))
            .await
            .is_ok());
        assert!(deployment
            .challenges
            .get_denied(ChallengeId::from(2u64))
            .await
            .is_ok());

        let error = actions
            .authorize_pending_challenge(action, ChallengeId::from(1u64))
            .await
            .unwrap_err();
        assert!(error
            .to_string()
            .contains("revert Expecting to have found the index of the Pending Challenge"));
    }

    #[tokio::test]
    async fn test_challenge_for_unknown_action_is_refused() {
        let chain = MockChain::new();
        let deployment = deploy(&environment(&chain)).await;

        let error = deployment
            .actions
            .create_pending_challenge(
                organization_id(),
                policy_id(),
                action_id(),
                agent_id(),
                device_id(),
                &token(),
                &title(),
                &message(),
            )
            .await
            .unwrap_err();
        assert!(error.to_string().contains("revert Expecting a pending action"));
        assert_eq!(
            deployment.challenges.last_challenge_id().await.unwrap(),
            ChallengeId::from(0u64)
        );
    }

    #[tokio::test]
    async fn test_unprivileged_sender_leaves_no_trace() {
        let chain = MockChain::new();
        let deployment = deploy(&environment(&chain)).await;
        let outsider = environment_as(&chain, stranger());
        let challenges = Challenges::at(&outsider, deployment.challenges.address().clone()).unwrap();

        let error = challenges
            .create_pending(
                organization_id(),
                policy_id(),
                agent_id(),
                action_id(),
                device_id(),
                &token(),
                &title(),
                &message(),
            )
            .await
            .unwrap_err();

        let rendered = error.to_string();
        assert!(rendered.starts_with(&format!(
            "Challenges @ {} createPending ( 121, 55, 22, 4, 300, ",
            deployment.challenges.address()
        )));
        assert!(rendered.contains("revert Sender is neither an owner nor an admin"));
        assert_eq!(
            challenges.last_challenge_id().await.unwrap(),
            ChallengeId::from(0u64)
        );
    }

    #[tokio::test]
    async fn test_destroyed_contract_answers_nothing() {
        let chain = MockChain::new();
        let deployment = deploy(&environment(&chain)).await;

        deployment.challenges.destroy().await.unwrap();

        let error = deployment.challenges.last_challenge_id().await.unwrap_err();
        assert!(error.to_string().contains("Returned values aren't valid"));
        assert!(!error.is_not_found());
    }

    #[tokio::test]
    async fn test_stopped_node_is_a_connection_error() {
        let chain = MockChain::new();
        let deployment = deploy(&environment(&chain)).await;

        chain.stop();
        let error = deployment.challenges.last_challenge_id().await.unwrap_err();
        assert!(error.to_string().starts_with(&format!(
            "Challenges @ {} lastChallengeId () failed. CONNECTION ERROR",
            deployment.challenges.address()
        )));

        chain.start();
        assert!(deployment.challenges.last_challenge_id().await.is_ok());
    }
}
