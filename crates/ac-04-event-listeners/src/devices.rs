use ac_03_contract_facades::receipts::DeviceReceipt;
use shared_types::Device;

use crate::errors::ListenerError;
use crate::listener::{Listening, Payload};

listener! {
    DevicesListener => "Devices"
}

impl DevicesListener {
    pub async fn start_created_device_listening<H>(&self, handler: H) -> Result<Listening, ListenerError>
    where
        H: FnMut(Device) + Send + 'static,
    {
        self.base
            .start_listening("createdDevice", Payload::Nested("device"), DeviceReceipt::inflate, handler)
            .await
    }

    /// Devices retired with a reason and date.
    pub async fn start_created_obsolete_device_listening<H>(
        &self,
        handler: H,
    ) -> Result<Listening, ListenerError>
    where
        H: FnMut(Device) + Send + 'static,
    {
        self.base
            .start_listening(
                "createdObsoleteDevice",
                Payload::Nested("device"),
                DeviceReceipt::inflate_obsolete,
                handler,
            )
            .await
    }
}
