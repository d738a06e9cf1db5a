use super::Task;

/// A mutable task collection. Implementors supply storage and ordering;
/// the merge and view logic on top is shared.
pub trait Store {
  fn add(&mut self, task: Task);
  fn remove(&mut self, task: &Task) -> bool;
  fn set_done(&mut self, index: usize, done: bool) -> bool;
  fn sort(&mut self);

  fn tasks(&self) -> &[Task];

  fn add_sorted(&mut self, task: Task) {
    self.add(task);
    self.sort();
  }

  /// Adds `task` unless an equal one is already present. Returns whether it
  /// was added.
  fn merge(&mut self, task: Task) -> bool {
    if self.tasks().contains(&task) {
      return false;
    }
    self.add(task);
    true
  }

  fn filtered(&self, include_done: bool) -> Vec<&Task> {
    self
      .tasks()
      .iter()
      .filter(|task| include_done || !task.is_done())
      .collect()
  }
}
