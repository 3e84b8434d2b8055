use std::collections::VecDeque;

use shared::domain::{LogEntry, LogKind};

/// Number of narration lines kept on screen.
pub const LOG_CAPACITY: usize = 9;

/// Rolling narration log. Appending past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct NarrationLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_seq: u64,
}

impl NarrationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    pub fn with_boot_lines<'a>(capacity: usize, lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut log = Self::new(capacity);
        for line in lines {
            log.push(LogKind::System, line);
        }
        log
    }

    pub fn push(&mut self, kind: LogKind, text: impl Into<String>) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            seq: self.next_seq,
            kind,
            text: text.into(),
        });
        self.next_seq += 1;
    }

    pub fn echo(&mut self, text: impl Into<String>) {
        self.push(LogKind::Echo, text);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_most_recent_entries() {
        let mut log = NarrationLog::new(LOG_CAPACITY);
        for i in 0..20 {
            log.echo(format!("line {i}"));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        let texts: Vec<_> = log.entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts.first(), Some(&"line 11"));
        assert_eq!(texts.last(), Some(&"line 19"));
    }

    #[test]
    fn boot_lines_are_system_entries_in_order() {
        let log = NarrationLog::with_boot_lines(LOG_CAPACITY, ["first", "second"]);
        let entries = log.to_vec();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.kind == LogKind::System));
        assert_eq!(entries[0].seq, 0);
        assert_eq!(entries[1].text, "second");
    }

    #[test]
    fn sequence_numbers_keep_growing_past_eviction() {
        let mut log = NarrationLog::new(2);
        log.echo("a");
        log.echo("b");
        log.echo("c");
        let seqs: Vec<_> = log.entries().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1, 2]);
    }
}
