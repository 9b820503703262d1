//! Logged certificate records.

use super::LoggedEntry;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Kind of submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    #[default]
    X509,
    Precert,
}

impl EntryType {
    fn tag(self) -> u8 {
        match self {
            Self::X509 => 0,
            Self::Precert => 1,
        }
    }
}

/// Signed certificate timestamp issued to the submitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCertificateTimestamp {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Log signature over the timestamp and entry.
    pub signature: Vec<u8>,
    /// Opaque CT extensions.
    pub extensions: Vec<u8>,
}

/// The submitted certificate material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryData {
    pub entry_type: EntryType,
    /// DER leaf certificate (or TBS certificate for precerts).
    pub leaf_certificate: Vec<u8>,
    /// Supporting chain up to a trusted root.
    pub certificate_chain: Vec<Vec<u8>>,
}

/// A certificate submission as recorded by the log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedCertificate {
    pub sct: SignedCertificateTimestamp,
    pub entry: LogEntryData,
    pub sequence_number: Option<u64>,
    pub provisional_sequence_number: Option<u64>,
}

impl LoggedCertificate {
    /// Create an unsequenced X509 entry.
    pub fn x509(timestamp: u64, leaf_certificate: impl Into<Vec<u8>>) -> Self {
        Self {
            sct: SignedCertificateTimestamp {
                timestamp,
                ..Default::default()
            },
            entry: LogEntryData {
                entry_type: EntryType::X509,
                leaf_certificate: leaf_certificate.into(),
                certificate_chain: Vec::new(),
            },
            sequence_number: None,
            provisional_sequence_number: None,
        }
    }

    /// SCT timestamp.
    pub fn timestamp(&self) -> u64 {
        self.sct.timestamp
    }

    /// Return this entry with a sequence number set.
    pub fn with_sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }
}

impl LoggedEntry for LoggedCertificate {
    /// SHA-256 over the entry type and the length-prefixed leaf certificate.
    ///
    /// The SCT and the chain are excluded: resubmitting a leaf yields the same
    /// identity even when it was stamped with a different timestamp.
    fn hash(&self) -> Vec<u8> {
        let leaf = &self.entry.leaf_certificate;
        let mut hasher = Sha256::new();
        hasher.update([self.entry.entry_type.tag()]);
        hasher.update((leaf.len() as u64).to_be_bytes());
        hasher.update(leaf);
        hasher.finalize().to_vec()
    }

    fn sequence_number(&self) -> Option<u64> {
        self.sequence_number
    }

    fn set_sequence_number(&mut self, sequence_number: u64) {
        self.sequence_number = Some(sequence_number);
    }

    fn provisional_sequence_number(&self) -> Option<u64> {
        self.provisional_sequence_number
    }

    fn set_provisional_sequence_number(&mut self, sequence_number: u64) {
        self.provisional_sequence_number = Some(sequence_number);
    }

    fn clear_provisional_sequence_number(&mut self) {
        self.provisional_sequence_number = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_ignores_timestamp_and_sequencing() {
        let a = LoggedCertificate::x509(9000, "leaf");
        let mut b = LoggedCertificate::x509(55555, "leaf");
        b.provisional_sequence_number = Some(3);
        b.sequence_number = Some(3);
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.hash().len(), 32);
    }

    #[test]
    fn test_hash_depends_on_content() {
        let a = LoggedCertificate::x509(9000, "leaf");
        let b = LoggedCertificate::x509(9000, "other leaf");
        assert_ne!(a.hash(), b.hash());

        let mut precert = a.clone();
        precert.entry.entry_type = EntryType::Precert;
        assert_ne!(a.hash(), precert.hash());
    }

    #[test]
    fn test_is_sequenced() {
        let cert = LoggedCertificate::x509(1, "leaf");
        assert!(!cert.is_sequenced());
        assert!(cert.with_sequence_number(7).is_sequenced());
    }
}
