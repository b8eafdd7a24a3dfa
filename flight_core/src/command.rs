//! External arbitration requests: parsing for the scripting console and the
//! channel that carries requests from other threads onto the tick thread.
//!
//! ## Command Grammar
//!
//! ```text
//! attitude <frame> <direction>      claim, e.g. `attitude orbit prograde`
//! attitude off | release            release the caller's claim
//! translate <mode> [speed] [kill]   e.g. `translate vertical 5 kill`
//! enable <module> | disable <module>
//! ```

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::sync::{Arc, Mutex, PoisonError};

use flight_common::prelude::{
    AttitudeSetpoint, Direction, ModuleId, ReferenceFrame, ScriptError, ScriptErrorKind,
    TranslationCommand, TranslationMode,
};
use tracing::warn;

/// One request against the arbitration API, stamped with who made it.
#[derive(Debug, Clone, PartialEq)]
pub enum ArbitrationRequest {
    ClaimAttitude {
        requester: ModuleId,
        setpoint: AttitudeSetpoint,
    },
    ReleaseAttitude {
        requester: ModuleId,
    },
    SetTranslation {
        requester: ModuleId,
        command: TranslationCommand,
    },
    SetEnabled {
        requester: ModuleId,
        module: String,
        enabled: bool,
    },
}

impl ArbitrationRequest {
    pub fn requester(&self) -> ModuleId {
        match self {
            Self::ClaimAttitude { requester, .. }
            | Self::ReleaseAttitude { requester }
            | Self::SetTranslation { requester, .. }
            | Self::SetEnabled { requester, .. } => *requester,
        }
    }
}

fn bad_argument(message: impl Into<String>) -> ScriptError {
    ScriptError::new(ScriptErrorKind::BadArgument, message)
}

/// Parse one console line on behalf of `requester`.
pub fn parse_command(requester: ModuleId, line: &str) -> Result<ArbitrationRequest, ScriptError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(ScriptError::new(ScriptErrorKind::Empty, "no command given"));
    };
    let args: Vec<&str> = words.collect();

    match verb.to_ascii_lowercase().as_str() {
        "release" => Ok(ArbitrationRequest::ReleaseAttitude { requester }),
        "attitude" => match args.as_slice() {
            ["off"] => Ok(ArbitrationRequest::ReleaseAttitude { requester }),
            [frame, direction] => {
                let frame: ReferenceFrame = frame.parse().map_err(bad_argument)?;
                let direction: Direction = direction.parse().map_err(bad_argument)?;
                Ok(ArbitrationRequest::ClaimAttitude {
                    requester,
                    setpoint: AttitudeSetpoint::new(frame, direction.into()),
                })
            }
            _ => Err(bad_argument("usage: attitude <frame> <direction> | attitude off")),
        },
        "translate" => {
            let Some((mode, rest)) = args.split_first() else {
                return Err(bad_argument("usage: translate <mode> [speed] [kill]"));
            };
            let mode: TranslationMode = mode.parse().map_err(bad_argument)?;
            let mut speed = 0.0;
            let mut kill_lateral = false;
            for (i, arg) in rest.iter().enumerate() {
                if arg.eq_ignore_ascii_case("kill") {
                    kill_lateral = true;
                } else if i == 0 {
                    speed = arg
                        .parse::<f64>()
                        .ok()
                        .filter(|s| s.is_finite())
                        .ok_or_else(|| bad_argument(format!("speed '{arg}' is not a number")))?;
                } else {
                    return Err(bad_argument(format!("unexpected argument '{arg}'")));
                }
            }
            Ok(ArbitrationRequest::SetTranslation {
                requester,
                command: TranslationCommand::new(mode, speed, kill_lateral),
            })
        }
        verb @ ("enable" | "disable") => match args.as_slice() {
            [module] => Ok(ArbitrationRequest::SetEnabled {
                requester,
                module: (*module).to_string(),
                enabled: verb == "enable",
            }),
            _ => Err(bad_argument(format!("usage: {verb} <module>"))),
        },
        other => Err(ScriptError::new(
            ScriptErrorKind::UnknownCommand,
            format!("'{other}'"),
        )),
    }
}

// ─── Cross-Thread Client ────────────────────────────────────────────

/// Last error of one client, written by the client itself (parse, send)
/// and by the core (apply).
#[derive(Debug, Clone, Default)]
struct ErrorSlot(Arc<Mutex<Option<ScriptError>>>);

impl ErrorSlot {
    fn set(&self, error: ScriptError) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    fn get(&self) -> Option<ScriptError> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// A request in flight from a client to the core.
#[derive(Debug)]
pub struct QueuedRequest {
    pub request: ArbitrationRequest,
    reply: ErrorSlot,
}

impl QueuedRequest {
    /// Report an error found while applying the request back to its client.
    pub fn reject(&self, error: &ScriptError) {
        self.reply.set(error.clone());
    }
}

/// Handle for a consumer outside the tick thread.
///
/// Requests are queued and applied at the start of the next fixed update, in
/// submission order, with last-write-wins semantics unchanged. Clones share
/// the id and the last error.
#[derive(Debug, Clone)]
pub struct ExternalClient {
    id: ModuleId,
    tx: Sender<QueuedRequest>,
    last_error: ErrorSlot,
}

impl ExternalClient {
    pub(crate) fn new(id: ModuleId, tx: Sender<QueuedRequest>) -> Self {
        Self {
            id,
            tx,
            last_error: ErrorSlot::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// Most recent failure, whether found here or by the core applying a
    /// queued request.
    pub fn last_error(&self) -> Option<ScriptError> {
        self.last_error.get()
    }

    pub fn submit(&mut self, request: ArbitrationRequest) -> Result<(), ScriptError> {
        let queued = QueuedRequest {
            request,
            reply: self.last_error.clone(),
        };
        self.tx.send(queued).map_err(|_| {
            self.fail(ScriptError::new(
                ScriptErrorKind::Disconnected,
                "flight core is gone",
            ))
        })
    }

    /// Parse and queue one console line.
    pub fn submit_line(&mut self, line: &str) -> Result<(), ScriptError> {
        let request = parse_command(self.id, line).map_err(|e| self.fail(e))?;
        self.submit(request)
    }

    fn fail(&mut self, error: ScriptError) -> ScriptError {
        warn!(client = %self.id, "{error}");
        self.last_error.set(error.clone());
        error
    }
}

/// Core side of the external request channel.
#[derive(Debug)]
pub struct RequestQueue {
    tx: Sender<QueuedRequest>,
    rx: Receiver<QueuedRequest>,
}

impl Default for RequestQueue {
    fn default() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }
}

impl RequestQueue {
    pub fn client(&self, id: ModuleId) -> ExternalClient {
        ExternalClient::new(id, self.tx.clone())
    }

    /// Next queued request without blocking.
    pub fn next(&self) -> Option<QueuedRequest> {
        match self.rx.try_recv() {
            Ok(request) => Some(request),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
