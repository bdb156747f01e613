//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    app_info::{AppAndVersionReq, AppAndVersionResp, AppNameReq, AppNameResp, VersionReq, VersionResp},
    chunk::{chunks, Chunks},
    frame::{Frame, FrameError, Response},
    path::Bip44Path,
    public_key::{PublicKeyReq, PublicKeyResp},
    status::{ParserStatus, StatusWord},
    tx::{NetworkMagic, ParseFailResp, SignTx, SignatureResp},
    Instruction,
};
