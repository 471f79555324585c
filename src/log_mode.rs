use serde::{Deserialize, Serialize};

/// Mode de journalisation utilisé par la console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogMode {
    /// Journal des événements dans un fichier local
    #[default]
    File,
    /// Journal via systemd-journal (feature `systemd`)
    SystemdJournal,
}

impl LogMode {
    pub fn writes_file(&self) -> bool {
        matches!(self, LogMode::File)
    }
}
