use clap::{Parser, Subcommand};
use humantime::Duration as HumanDuration;
use std::error::Error;
use std::io::{stderr, stdout, Write};
use std::path::{Path, PathBuf};
use time::Duration;

use crate::engine::{load_file, save_file, Deadline, Priority, Store, Task};

#[derive(Debug, Parser)]
#[command(name = "alldone", author, version, about)]
struct Opts {
  #[arg(long, short, default_value = "tasks.json")]
  /// File the task list is loaded from and saved to
  file: PathBuf,

  #[command(subcommand)]
  cmd: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
enum Cmd {
  #[command(visible_alias = "ls")]
  /// List tasks, most urgent first
  List {
    #[arg(long)]
    /// Show done tasks too
    all: bool,
  },

  /// Add a new task
  Add {
    #[arg(long, value_name = "DATE", conflicts_with = "due_in")]
    /// Absolute deadline as YYYY-MM-DD
    due: Option<Deadline>,

    #[arg(long = "in", value_name = "DURATION", default_value = "1week")]
    /// Deadline as a duration from today, e.g. 3days or 2weeks
    due_in: HumanDuration,

    #[arg(long, short, default_value = "low")]
    /// One of low, medium or high
    priority: Priority,

    description: String,
  },

  /// Mark a task as done
  Do { number: usize },

  /// Mark a done task as pending again
  Undo { number: usize },

  #[command(visible_alias = "rm")]
  /// Remove a task for good
  Remove { number: usize },

  /// Merge the tasks of another task file into this one
  Import { path: PathBuf },
}

impl Cmd {
  fn readonly(&self) -> bool {
    matches!(self, Self::List { .. })
  }
}

pub fn cli<S: Store>(store: S) -> Result<(), Box<dyn Error>> {
  let opts = Opts::parse();
  handle_command(&opts.cmd, store, &opts.file)
}

fn handle_command<S: Store>(
  command: &Option<Cmd>,
  mut store: S,
  file: &Path,
) -> Result<(), Box<dyn Error>> {
  let default = Cmd::List {
    all: atty::isnt(atty::Stream::Stdout),
  };
  let cmd = command.as_ref().unwrap_or(&default);
  load_file(&mut store, file)?;
  store.sort();
  if cmd.readonly() {
    handle_command_impl(cmd, &mut store, &mut stdout())
  } else {
    handle_command_impl(cmd, &mut store, &mut stderr())?;
    save_file(&store, file)?;
    Ok(())
  }
}

fn handle_command_impl<S: Store, W: Write>(
  command: &Cmd,
  store: &mut S,
  output: &mut W,
) -> Result<(), Box<dyn Error>> {
  match command {
    Cmd::Add {
      due,
      due_in,
      priority,
      description,
    } => add_task(store, output, description, *due, due_in, *priority),
    Cmd::Do { number } => set_task_done(store, output, *number, true),
    Cmd::Import { path } => import_tasks(store, output, path),
    Cmd::List { all } => list_tasks(store, output, *all),
    Cmd::Remove { number } => remove_task(store, output, *number),
    Cmd::Undo { number } => set_task_done(store, output, *number, false),
  }
}

fn list_tasks<S: Store, W: Write>(
  store: &S,
  output: &mut W,
  all: bool,
) -> Result<(), Box<dyn Error>> {
  let width = store.tasks().len().to_string().len();
  for (number, task) in store.tasks().iter().enumerate() {
    // Done tasks keep their numbers, so hiding them leaves gaps.
    if all || !task.is_done() {
      writeln!(output, "{:width$} {}", number + 1, task, width = width)?;
    }
  }
  Ok(())
}

fn add_task<S: Store, W: Write>(
  store: &mut S,
  output: &mut W,
  description: &str,
  due: Option<Deadline>,
  due_in: &HumanDuration,
  priority: Priority,
) -> Result<(), Box<dyn Error>> {
  let description = description.trim();
  if description.is_empty() {
    return Err("task description cannot be empty".into());
  }
  let deadline = match due {
    Some(deadline) => deadline,
    None => Deadline::today_utc()
      .checked_add(Duration::try_from(**due_in)?)
      .ok_or("deadline too far in the future")?,
  };
  let task = Task::new(description, deadline, priority);
  store.add_sorted(task.clone());
  if let Some(number) = store.tasks().iter().position(|candidate| candidate == &task) {
    writeln!(output, "{} {}", number + 1, task)?;
  }
  Ok(())
}

fn set_task_done<S: Store, W: Write>(
  store: &mut S,
  output: &mut W,
  number: usize,
  done: bool,
) -> Result<(), Box<dyn Error>> {
  let index = number.checked_sub(1).ok_or("task numbers start at 1")?;
  if !store.set_done(index, done) {
    return Err(format!("no task number {number}").into());
  }
  writeln!(output, "{} {}", number, store.tasks()[index])?;
  Ok(())
}

fn remove_task<S: Store, W: Write>(
  store: &mut S,
  output: &mut W,
  number: usize,
) -> Result<(), Box<dyn Error>> {
  let index = number.checked_sub(1).ok_or("task numbers start at 1")?;
  let task = store
    .tasks()
    .get(index)
    .ok_or_else(|| format!("no task number {number}"))?
    .clone();
  store.remove(&task);
  writeln!(output, "removed {task}")?;
  Ok(())
}

fn import_tasks<S: Store, W: Write>(
  store: &mut S,
  output: &mut W,
  path: &Path,
) -> Result<(), Box<dyn Error>> {
  let added = load_file(store, path)?;
  store.sort();
  writeln!(output, "imported {added} new task(s) from {}", path.display())?;
  Ok(())
}
