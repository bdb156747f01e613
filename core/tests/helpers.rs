#![allow(unused)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use log::{debug, trace};
use p256::ecdsa::{signature::Signer, Signature};

use ledger_neo_core::{
    apdu::{path::Bip44Path, public_key::PUBLIC_KEY_LEN, tx::MAX_SIGNATURE_LEN},
    confirm::{Approver, Page},
    consts::RESPONSE_LEN,
    engine::{Driver, Engine, Error},
};
use ledger_neo_tests::keys;

pub use ledger_neo_tests::keys::SEED;

/// In-memory device, exchanging raw frames with an [Engine]
#[derive(Clone)]
pub struct TestEngine {
    pub engine: Arc<Mutex<Engine<TestDriver, TestApprover>>>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_seed(SEED)
    }

    pub fn with_seed(seed: [u8; 32]) -> Self {
        let e = Engine::new(TestDriver { seed }, TestApprover::default());

        Self {
            engine: Arc::new(Mutex::new(e)),
        }
    }

    /// Set the decision for subsequent transactions
    pub fn set_approve(&self, approve: bool) {
        let mut e = self.engine.lock().unwrap();
        e.approver_mut().approve = approve;
    }

    /// Take the pages reviewed since the last call
    pub fn take_pages(&self) -> Vec<(String, String)> {
        let mut e = self.engine.lock().unwrap();
        core::mem::take(&mut e.approver_mut().pages)
    }
}

#[async_trait]
impl ledger_neo::Exchange for TestEngine {
    async fn exchange(&self, frame: &[u8], _timeout: Duration) -> Result<Vec<u8>, ledger_neo::Error> {
        trace!("cmd: {:02x?}", frame);

        let mut resp = [0u8; RESPONSE_LEN];
        let n = self.engine.lock().unwrap().process(frame, &mut resp);

        trace!("resp: {:02x?}", &resp[..n]);

        Ok(resp[..n].to_vec())
    }
}

/// Driver implementation for test use
pub struct TestDriver {
    pub seed: [u8; 32],
}

impl Driver for TestDriver {
    fn public_key(&self, path: &Bip44Path) -> Result<[u8; PUBLIC_KEY_LEN], Error> {
        Ok(keys::public_key(&self.seed, path))
    }

    fn sign(
        &self,
        path: &Bip44Path,
        msg: &[u8],
    ) -> Result<heapless::Vec<u8, MAX_SIGNATURE_LEN>, Error> {
        let s: Signature = keys::signing_key(&self.seed, path).sign(msg);

        heapless::Vec::from_slice(s.to_der().as_bytes()).map_err(|_| Error::SignFail)
    }
}

/// Approver recording reviewed pages, with a preset decision
#[derive(Default)]
pub struct TestApprover {
    pub approve: bool,
    pub pages: Vec<(String, String)>,
}

impl Approver for TestApprover {
    fn review(&mut self, page: &Page) -> bool {
        debug!("page: {} / {}", page.title, page.value);

        self.pages
            .push((page.title.to_string(), page.value.to_string()));
        true
    }

    fn decide(&mut self) -> bool {
        debug!("decision: {}", self.approve);

        self.approve
    }
}

pub async fn approve_tx(e: &TestEngine) {
    debug!("Approve transaction");

    e.set_approve(true);
}

pub async fn deny_tx(e: &TestEngine) {
    debug!("Deny transaction");

    e.set_approve(false);
}
