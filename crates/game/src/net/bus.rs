use super::protocol::{ClientIntent, EncryptionMultiples, SequenceStart};

/// Outbound side of the connection. Every send is fire-and-forget.
pub trait NetworkSender {
    fn send(&mut self, intent: ClientIntent);

    fn set_encryption(&mut self, multiples: EncryptionMultiples);

    fn set_sequence(&mut self, start: SequenceStart);
}

/// Sender that queues intents for a transport to drain.
#[derive(Debug, Default)]
pub struct Outbox {
    queued: Vec<ClientIntent>,
    encryption: Option<EncryptionMultiples>,
    sequence: Option<SequenceStart>,
    sent_total: u64,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<ClientIntent> {
        std::mem::take(&mut self.queued)
    }

    pub fn queued(&self) -> &[ClientIntent] {
        &self.queued
    }

    pub fn encryption(&self) -> Option<EncryptionMultiples> {
        self.encryption
    }

    pub fn sequence(&self) -> Option<SequenceStart> {
        self.sequence
    }

    pub fn sent_total(&self) -> u64 {
        self.sent_total
    }
}

impl NetworkSender for Outbox {
    fn send(&mut self, intent: ClientIntent) {
        log::debug!("-> {:?}", intent);
        self.queued.push(intent);
        self.sent_total += 1;
    }

    fn set_encryption(&mut self, multiples: EncryptionMultiples) {
        self.encryption = Some(multiples);
    }

    fn set_sequence(&mut self, start: SequenceStart) {
        self.sequence = Some(start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_queue_but_keeps_total() {
        let mut outbox = Outbox::new();
        outbox.send(ClientIntent::Sit);
        outbox.send(ClientIntent::Stand);

        assert_eq!(outbox.drain(), vec![ClientIntent::Sit, ClientIntent::Stand]);
        assert!(outbox.queued().is_empty());
        assert_eq!(outbox.sent_total(), 2);
    }
}
