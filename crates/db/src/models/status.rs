//! Queue status enum mapping to the SMALLINT `status` column.

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Lifecycle of a queue entry.
///
/// `pending -> processing -> {completed | failed}`; the terminal states
/// are never revisited. Discriminants match the seeded column values.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    Pending = 1,
    Processing = 2,
    Completed = 3,
    Failed = 4,
}

impl QueueStatus {
    pub const ALL: [QueueStatus; 4] = [
        QueueStatus::Pending,
        QueueStatus::Processing,
        QueueStatus::Completed,
        QueueStatus::Failed,
    ];

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Lowercase name used in logs and the status surface.
    pub fn as_str(self) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Processing => "processing",
            QueueStatus::Completed => "completed",
            QueueStatus::Failed => "failed",
        }
    }

    /// Whether no further transition can occur from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, QueueStatus::Completed | QueueStatus::Failed)
    }

    pub fn from_id(id: StatusId) -> Option<QueueStatus> {
        QueueStatus::ALL.into_iter().find(|s| s.id() == id)
    }
}

impl From<QueueStatus> for StatusId {
    fn from(value: QueueStatus) -> Self {
        value as StatusId
    }
}
