//! Shared helpers for the unit tests in this crate.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;

use crate::process::{CommandExecutor, CommandOutcome, CommandSpec};

/// Records every command and answers with scripted results.
///
/// When the script runs out every further command succeeds.
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    calls: RefCell<Vec<CommandSpec>>,
    responses: RefCell<VecDeque<io::Result<CommandOutcome>>>,
    on_execute: Option<Box<dyn Fn(&CommandSpec)>>,
}

impl RecordingExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond_with_code(self, code: i32) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(CommandOutcome::from_code(Some(code))));
        self
    }

    pub(crate) fn respond_with_error(self, kind: io::ErrorKind) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(io::Error::new(kind, "scripted failure")));
        self
    }

    /// Run `hook` while each command "executes", e.g. to inspect the
    /// environment the child would have inherited.
    pub(crate) fn on_execute(mut self, hook: impl Fn(&CommandSpec) + 'static) -> Self {
        self.on_execute = Some(Box::new(hook));
        self
    }

    pub(crate) fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute(&self, spec: &CommandSpec) -> io::Result<CommandOutcome> {
        self.calls.borrow_mut().push(spec.clone());
        if let Some(hook) = &self.on_execute {
            hook(spec);
        }
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(CommandOutcome::from_code(Some(0))))
    }
}
