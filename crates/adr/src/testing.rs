//! Test doubles for the confirm and executor seams

use anyhow::Result;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use crate::exec::{Executor, RunOutcome};
use crate::gate::Confirm;
use crate::paths::INDEX_FILE;

/// Answers prompts from a fixed script; an exhausted script answers no
pub struct ScriptedConfirm {
    answers: RefCell<VecDeque<bool>>,
    asked: Cell<usize>,
    questions: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            asked: Cell::new(0),
            questions: RefCell::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.get()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        self.asked.set(self.asked.get() + 1);
        self.questions.borrow_mut().push(question.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }
}

/// A recorded executor call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub label: String,
    pub key: String,
    pub args: Vec<String>,
}

/// Records calls and returns a fixed outcome without spawning anything
pub struct RecordingExecutor {
    program: String,
    outcome: RunOutcome,
    calls: RefCell<Vec<Call>>,
}

impl RecordingExecutor {
    pub fn new(program: &str, outcome: RunOutcome) -> Self {
        Self {
            program: program.to_string(),
            outcome,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl Executor for RecordingExecutor {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, label: &str, key: &str, args: &[String]) -> Result<RunOutcome> {
        self.calls.borrow_mut().push(Call {
            label: label.to_string(),
            key: key.to_string(),
            args: args.to_vec(),
        });
        Ok(self.outcome)
    }
}

/// Write an index file into `root`
pub fn write_index(root: &Path, content: &str) {
    fs::write(root.join(INDEX_FILE), content).unwrap();
}

/// Write a file (creating parents) relative to `root`
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
