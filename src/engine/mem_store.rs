use super::{Store, Task};

#[derive(Debug, Default)]
pub struct MemStore {
  tasks: Vec<Task>,
}

impl MemStore {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }
}

impl Store for MemStore {
  fn add(&mut self, task: Task) {
    self.tasks.push(task);
  }

  fn remove(&mut self, task: &Task) -> bool {
    self
      .tasks
      .iter()
      .position(|candidate| candidate == task)
      .map_or(false, |index| {
        self.tasks.remove(index);
        true
      })
  }

  fn set_done(&mut self, index: usize, done: bool) -> bool {
    self.tasks.get_mut(index).map_or(false, |task| {
      task.set_done(done);
      true
    })
  }

  fn sort(&mut self) {
    // Stable, so equally urgent tasks keep their insertion order.
    self.tasks.sort_by_key(Task::urgency);
  }

  fn tasks(&self) -> &[Task] {
    &self.tasks
  }
}
