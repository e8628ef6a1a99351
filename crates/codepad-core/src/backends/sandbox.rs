//! Embedded JavaScript interpreter with console capture
//!
//! Runs a trusted-origin snippet in a fresh `deno_core` isolate. A console
//! shim routes every `console.*` call through an op into an explicit capture
//! sink, one captured line per call, in invocation order. Thrown errors are
//! recovered as a single stderr line; nothing escapes to the caller.
//!
//! The interpreted code gets no filesystem, network, or timer access: the
//! isolate carries only the capture extension.

use std::cell::RefCell;
use std::rc::Rc;

use deno_core::error::{AnyError, JsError};
use deno_core::{extension, op2, JsRuntime, ModuleCodeString, OpState, RuntimeOptions};

use crate::core_types::{CapturedOutputLine, OutputChannel};
use crate::errors::PlaygroundError;

/// Explicit output sink handed to each interpreter run. Holding the sink
/// outside the isolate means concurrent runs can never cross-talk.
#[derive(Clone, Default)]
pub struct CaptureSink {
    lines: Rc<RefCell<Vec<CapturedOutputLine>>>,
    echo: bool,
}

impl CaptureSink {
    pub fn new(echo: bool) -> Self {
        Self {
            lines: Rc::new(RefCell::new(Vec::new())),
            echo,
        }
    }

    fn push(&self, channel: OutputChannel, text: String) {
        if self.echo {
            log::debug!("sandbox {:?}: {}", channel, text);
        }
        self.lines.borrow_mut().push(CapturedOutputLine { channel, text });
    }

    fn take(&self) -> Vec<CapturedOutputLine> {
        std::mem::take(&mut self.lines.borrow_mut())
    }
}

#[op2(fast)]
fn op_console_capture(state: &mut OpState, #[string] channel: &str, #[string] text: &str) {
    let sink = state.borrow::<CaptureSink>().clone();
    let channel = if channel == "stderr" {
        OutputChannel::Stderr
    } else {
        OutputChannel::Stdout
    };
    sink.push(channel, text.to_string());
}

extension!(
    console_capture,
    ops = [op_console_capture],
    options = { sink: CaptureSink },
    state = |state, options| {
        state.put(options.sink);
    },
);

/// Replaces the ambient console with writers that forward into the capture
/// op. log/info/debug land on stdout, warn/error on stderr.
const CONSOLE_SHIM: &str = r#"
((globalThis) => {
  const core = Deno.core;
  const format = (args) => args.map((value) => {
    if (typeof value === "object" && value !== null) {
      try { return JSON.stringify(value); } catch (_) { return String(value); }
    }
    return String(value);
  }).join(" ");
  const write = (channel) => (...args) => core.ops.op_console_capture(channel, format(args));
  globalThis.console = {
    log: write("stdout"),
    info: write("stdout"),
    debug: write("stdout"),
    warn: write("stderr"),
    error: write("stderr"),
  };
})(globalThis);
"#;

/// Synchronous single-shot interpreter. Each run builds a fresh isolate and
/// sink, so state never leaks between runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalInterpreterSandbox {
    echo: bool,
}

impl LocalInterpreterSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also mirror captured lines to the host log.
    pub fn with_echo(echo: bool) -> Self {
        Self { echo }
    }

    /// Execute a snippet and return the captured lines. A thrown exception
    /// becomes a stderr line; this function itself never fails on user code.
    pub fn run(&self, source: &str) -> Vec<CapturedOutputLine> {
        let sink = CaptureSink::new(self.echo);
        let mut runtime = JsRuntime::new(RuntimeOptions {
            extensions: vec![console_capture::init_ops(sink.clone())],
            ..Default::default()
        });

        if let Err(err) = runtime.execute_script("<console-shim>", CONSOLE_SHIM) {
            sink.push(
                OutputChannel::Stderr,
                format!("console interception failed: {}", err),
            );
            return sink.take();
        }

        match runtime.execute_script("<playground>", ModuleCodeString::from(source.to_string())) {
            Ok(_) => {}
            Err(err) => sink.push(OutputChannel::Stderr, render_js_error(err)),
        }

        sink.take()
    }

    /// Run on a blocking thread so the caller's event loop never stalls on a
    /// long-running snippet.
    pub async fn run_async(self, source: String) -> Result<Vec<CapturedOutputLine>, PlaygroundError> {
        tokio::task::spawn_blocking(move || self.run(&source))
            .await
            .map_err(|e| PlaygroundError::RuntimeExecution(format!("interpreter task failed: {}", e)))
    }
}

fn render_js_error(err: AnyError) -> String {
    match err.downcast::<JsError>() {
        Ok(js_error) => {
            let message = js_error.exception_message;
            message
                .strip_prefix("Uncaught ")
                .map(str::to_string)
                .unwrap_or(message)
        }
        Err(other) => other.to_string(),
    }
}

/// Render captured lines as canonical output text, in capture order.
pub fn render_lines(lines: &[CapturedOutputLine]) -> String {
    lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_single_stdout_line() {
        let sandbox = LocalInterpreterSandbox::new();
        let lines = sandbox.run(r#"console.log("hi")"#);
        assert_eq!(lines, vec![CapturedOutputLine::stdout("hi")]);
    }

    #[test]
    fn test_thrown_error_becomes_stderr_line() {
        let sandbox = LocalInterpreterSandbox::new();
        let lines = sandbox.run(r#"throw new Error("boom")"#);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].channel, OutputChannel::Stderr);
        assert_eq!(lines[0].text, "Error: boom");
    }

    #[test]
    fn test_output_preserves_invocation_order() {
        let sandbox = LocalInterpreterSandbox::new();
        let lines = sandbox.run(
            r#"
            console.log("first");
            console.error("second");
            console.log("third");
            "#,
        );
        assert_eq!(
            lines,
            vec![
                CapturedOutputLine::stdout("first"),
                CapturedOutputLine::stderr("second"),
                CapturedOutputLine::stdout("third"),
            ]
        );
    }

    #[test]
    fn test_lines_before_throw_are_kept() {
        let sandbox = LocalInterpreterSandbox::new();
        let lines = sandbox.run(
            r#"
            console.log("before");
            throw new Error("boom");
            "#,
        );
        assert_eq!(lines[0], CapturedOutputLine::stdout("before"));
        assert_eq!(lines[1], CapturedOutputLine::stderr("Error: boom"));
    }

    #[test]
    fn test_multiple_arguments_and_objects() {
        let sandbox = LocalInterpreterSandbox::new();
        let lines = sandbox.run(r#"console.log("count:", 2, {"a": 1})"#);
        assert_eq!(lines, vec![CapturedOutputLine::stdout(r#"count: 2 {"a":1}"#)]);
    }

    #[test]
    fn test_warn_routes_to_stderr() {
        let sandbox = LocalInterpreterSandbox::new();
        let lines = sandbox.run(r#"console.warn("careful")"#);
        assert_eq!(lines, vec![CapturedOutputLine::stderr("careful")]);
    }

    #[test]
    fn test_runs_are_isolated() {
        let sandbox = LocalInterpreterSandbox::new();
        sandbox.run("globalThis.leak = 42; console.log(globalThis.leak)");
        let lines = sandbox.run("console.log(typeof globalThis.leak)");
        assert_eq!(lines, vec![CapturedOutputLine::stdout("undefined")]);
    }

    #[test]
    fn test_render_lines_joins_in_order() {
        let lines = vec![
            CapturedOutputLine::stdout("a"),
            CapturedOutputLine::stderr("b"),
        ];
        assert_eq!(render_lines(&lines), "a\nb");
    }

    #[tokio::test]
    async fn test_run_async_delegates() {
        let sandbox = LocalInterpreterSandbox::new();
        let lines = sandbox
            .run_async(r#"console.log("async hi")"#.to_string())
            .await
            .unwrap();
        assert_eq!(lines, vec![CapturedOutputLine::stdout("async hi")]);
    }
}
