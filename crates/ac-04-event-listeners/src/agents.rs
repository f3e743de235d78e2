use ac_03_contract_facades::receipts::AgentReceipt;
use shared_types::Agent;

use crate::errors::ListenerError;
use crate::listener::{Listening, Payload};

listener! {
    AgentsListener => "Agents"
}

impl AgentsListener {
    pub async fn start_created_agent_listening<H>(&self, handler: H) -> Result<Listening, ListenerError>
    where
        H: FnMut(Agent) + Send + 'static,
    {
        self.base
            .start_listening("createdAgent", Payload::Nested("agent"), AgentReceipt::inflate, handler)
            .await
    }
}
