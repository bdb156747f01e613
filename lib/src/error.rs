// Copyright (c) 2022-2023 The MobileCoin Foundation

use core::fmt::Display;

use ledger_neo_apdu::{
    app_info::AppAndVersionReq,
    frame::{FrameError, Response},
    ApduStatic, Instruction, ParserStatus, StatusWord, BOLOS_APDU_CLA, NEO_APDU_CLA,
};
use tokio::time::error::Elapsed;

/// Ledger NEO API Error Type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport error (channel unavailable, connection lost)
    #[error("Transport error {0}")]
    Transport(anyhow::Error),

    /// Request timeout
    #[error("Timeout waiting for device response")]
    RequestTimeout,

    /// Timeout waiting for user
    #[error("Timeout waiting for user interaction")]
    UserTimeout,

    /// Malformed command or response frame
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Unexpected APDU response
    #[error("Unexpected APDU response")]
    UnexpectedResponse,

    /// Device returned a non-success status word
    #[error("{0}")]
    Device(#[from] DeviceError),
}

impl From<Elapsed> for Error {
    fn from(_: Elapsed) -> Self {
        Error::RequestTimeout
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Transport(anyhow::anyhow!("IO: {}", e))
    }
}

impl Error {
    /// Fetch the mapped device status, if this error was reported by the device
    pub fn status(&self) -> Option<StatusWord> {
        match self {
            Error::Device(d) => Some(d.status),
            _ => None,
        }
    }

    /// Fetch the transaction parser status, for `SW_TX_PARSING_FAIL` errors
    pub fn parser_status(&self) -> Option<ParserStatus> {
        match self {
            Error::Device(d) => d.parser,
            _ => None,
        }
    }
}

/// Non-success response from the device, tagged with the originating command
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeviceError {
    /// Command class
    pub cla: u8,
    /// Command instruction
    pub ins: u8,
    /// Raw status word
    pub sw: u16,
    /// Mapped status word
    pub status: StatusWord,
    /// Parser status reported with `SW_TX_PARSING_FAIL`
    pub parser: Option<ParserStatus>,
}

impl DeviceError {
    /// Build a device error from a (non-success) response to the provided command
    pub fn new(cla: u8, ins: u8, resp: &Response) -> Self {
        let status = resp.status();

        let parser = match status {
            StatusWord::TxParsingFail => resp.data.first().and_then(|b| ParserStatus::from_byte(*b)),
            _ => None,
        };

        Self {
            cla,
            ins,
            sw: resp.sw,
            status,
            parser,
        }
    }

    /// Name of the command that failed
    pub fn command(&self) -> CommandName {
        CommandName(self.cla, self.ins)
    }
}

impl Display for DeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} failed: {} ({:#06x})",
            self.command(),
            self.status,
            self.sw
        )?;

        if let Some(p) = self.parser {
            write!(f, ", {p}")?;
        }

        Ok(())
    }
}

impl std::error::Error for DeviceError {}

/// Display helper for command class / instruction pairs
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CommandName(pub u8, pub u8);

impl Display for CommandName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match (self.0, Instruction::try_from(self.1)) {
            (BOLOS_APDU_CLA, _) if self.1 == AppAndVersionReq::INS => {
                write!(f, "GET_APP_AND_VERSION")
            }
            (NEO_APDU_CLA, Ok(i)) => write!(f, "{i}"),
            (cla, _) => write!(f, "CLA {:#04x} INS {:#04x}", cla, self.1),
        }
    }
}
