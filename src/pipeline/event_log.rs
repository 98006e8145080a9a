// src/pipeline/event_log.rs
//
// JSON-lines sink for count events, one object per line.

use crate::error::Result;
use crate::types::CountEvent;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

pub struct CountEventLog {
    writer: BufWriter<File>,
    written: usize,
}

impl CountEventLog {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        info!("💾 Count events will be written to: {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn append(&mut self, event: &CountEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectKey;

    #[test]
    fn test_writes_one_line_per_event() {
        let path = std::env::temp_dir().join(format!(
            "wagon_detection_events_{}.jsonl",
            std::process::id()
        ));
        let mut log = CountEventLog::create(&path).unwrap();
        for count in 1..=2 {
            log.append(&CountEvent {
                frame_index: 10 * count,
                count,
                key: ObjectKey { x: 5, y: count as i32 },
                area: 3500.0,
                distance_to_line: 3,
            })
            .unwrap();
        }
        log.flush().unwrap();
        assert_eq!(log.written(), 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: CountEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.frame_index, 20);
        assert_eq!(second.key, ObjectKey { x: 5, y: 2 });
    }
}
