use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use thiserror::Error;

use super::{Store, Task};

#[derive(Debug, Error)]
pub enum PersistError {
  #[error("task file i/o failed: {0}")]
  Io(#[from] std::io::Error),
  #[error("task file is malformed: {0}")]
  Format(#[source] serde_json::Error),
}

impl From<serde_json::Error> for PersistError {
  fn from(err: serde_json::Error) -> Self {
    if err.is_io() {
      Self::Io(err.into())
    } else {
      Self::Format(err)
    }
  }
}

/// Writes the whole collection as one JSON array, in the store's current
/// order, followed by a newline.
pub fn save<S: Store, W: Write>(store: &S, mut sink: W) -> Result<(), PersistError> {
  serde_json::to_writer(&mut sink, store.tasks())?;
  sink.write_all(b"\n")?;
  Ok(())
}

/// Merges every task read from `source` into `store`, skipping tasks that
/// are already present. Returns how many were added. The input is parsed
/// completely before anything is merged, so a malformed source leaves the
/// store untouched.
pub fn load<S: Store, R: Read>(store: &mut S, source: R) -> Result<usize, PersistError> {
  let tasks: Vec<Task> = serde_json::from_reader(source)?;
  let mut added = 0;
  for task in tasks {
    if store.merge(task) {
      added += 1;
    }
  }
  Ok(added)
}

pub fn save_file<S: Store>(store: &S, path: &Path) -> Result<(), PersistError> {
  let file = File::create(path)?;
  let mut sink = BufWriter::new(file);
  save(store, &mut sink)?;
  sink.flush()?;
  debug!("saved {} task(s) to {}", store.tasks().len(), path.display());
  Ok(())
}

/// Like [`load`], but reads from a file. A missing file counts as an empty
/// collection.
pub fn load_file<S: Store>(store: &mut S, path: &Path) -> Result<usize, PersistError> {
  let file = match File::open(path) {
    Ok(file) => file,
    Err(err) if err.kind() == ErrorKind::NotFound => {
      debug!("no task file at {}, starting empty", path.display());
      return Ok(0);
    }
    Err(err) => return Err(err.into()),
  };
  let added = load(store, BufReader::new(file))?;
  debug!("loaded {added} new task(s) from {}", path.display());
  Ok(added)
}

#[cfg(test)]
mod test {
  use super::{load, load_file, save, save_file, PersistError};
  use crate::engine::{Deadline, MemStore, Priority, Store, Task};
  use std::io::{self, Read};

  fn due(s: &str) -> Deadline {
    s.parse().unwrap()
  }

  fn sample_store() -> MemStore {
    let mut store = MemStore::new();
    store.add(Task::new("File taxes", due("2025-04-15"), Priority::High));
    store
  }

  #[test]
  fn save_writes_one_line_of_json() {
    let mut sink = Vec::new();
    save(&sample_store(), &mut sink).unwrap();
    assert_eq!(
      String::from_utf8(sink).unwrap(),
      "[{\"description\":\"File taxes\",\"deadline\":\"2025-04-15\",\"priority\":\"HIGH\",\"done\":false}]\n"
    );
  }

  #[test]
  fn empty_stores_round_trip() {
    let mut sink = Vec::new();
    save(&MemStore::new(), &mut sink).unwrap();
    assert_eq!(sink, b"[]\n");

    let mut store = MemStore::new();
    assert_eq!(load(&mut store, sink.as_slice()).unwrap(), 0);
    assert!(store.tasks().is_empty());
  }

  #[test]
  fn load_merges_and_counts_new_tasks() {
    let mut sink = Vec::new();
    let mut store = MemStore::new();
    store.add(Task::new("File taxes", due("2025-04-15"), Priority::High));
    store.add(Task::new("Buy milk", due("2025-06-01"), Priority::Low));
    save(&store, &mut sink).unwrap();

    let mut other = MemStore::new();
    other.add(Task::new("Buy milk", due("2025-06-01"), Priority::Low));
    assert_eq!(load(&mut other, sink.as_slice()).unwrap(), 1);
    assert_eq!(other.tasks().len(), 2);

    assert_eq!(load(&mut other, sink.as_slice()).unwrap(), 0);
    assert_eq!(other.tasks().len(), 2);
  }

  #[test]
  fn malformed_input_leaves_the_store_alone() {
    let mut store = sample_store();
    let err = load(&mut store, &b"[{\"description\":\"x\"}"[..]).unwrap_err();
    assert!(matches!(err, PersistError::Format(_)));
    assert_eq!(store.tasks().len(), 1);

    // One bad record poisons the whole input, even after valid ones.
    let mixed = b"[{\"description\":\"Call the bank\",\"deadline\":\"2025-05-01\",\"priority\":\"HIGH\",\"done\":false},{\"description\":\"Broken\"}]";
    let err = load(&mut store, &mixed[..]).unwrap_err();
    assert!(matches!(err, PersistError::Format(_)));
    assert_eq!(store.tasks().len(), 1);
  }

  struct FailingReader;

  impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
      Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken"))
    }
  }

  #[test]
  fn read_failures_surface_as_io_errors() {
    let mut store = MemStore::new();
    let err = load(&mut store, FailingReader).unwrap_err();
    assert!(matches!(err, PersistError::Io(_)));
  }

  #[test]
  fn file_round_trip_adds_nothing_the_second_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let store = sample_store();
    save_file(&store, &path).unwrap();

    let mut loaded = MemStore::new();
    assert_eq!(load_file(&mut loaded, &path).unwrap(), 1);
    assert_eq!(loaded.tasks(), store.tasks());
    assert_eq!(load_file(&mut loaded, &path).unwrap(), 0);
  }

  #[test]
  fn missing_files_count_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = sample_store();
    let absent = dir.path().join("absent.json");
    assert_eq!(load_file(&mut store, &absent).unwrap(), 0);
    assert_eq!(store.tasks(), sample_store().tasks());
  }
}
