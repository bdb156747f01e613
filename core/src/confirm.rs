// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction confirmation
//!
//! A validated [`Transaction`] is rendered to an ordered [`Summary`] of
//! [`Page`]s, which the [`Gate`] presents to an [`Approver`] one at a time
//! before requesting a final approve / reject decision.

use core::fmt::Write;

use heapless::{String, Vec};
use ledger_neo_apdu::tx::NetworkMagic;
use strum::Display;

use crate::{
    engine::Error,
    helpers::{fmt_gas_fee, fmt_hex, fmt_script_hash, fmt_token_val},
    tx::{ScriptKind, Transaction},
};

/// Maximum rendered value length
pub const PAGE_VALUE_LEN: usize = 80;

/// Maximum pages per summary (two signers with full contract and group lists)
pub const MAX_PAGES: usize = 80;

/// Rendered page value
pub type PageValue = String<PAGE_VALUE_LEN>;

/// Single titled fact presented for review
#[derive(Clone, PartialEq, Debug)]
pub struct Page {
    pub title: &'static str,
    pub value: PageValue,
}

impl Page {
    fn new(title: &'static str, value: impl core::fmt::Display) -> Result<Self, Error> {
        let mut v = PageValue::new();
        write!(v, "{}", value).map_err(|_| Error::ConfirmationFailed)?;

        Ok(Self { title, value: v })
    }
}

/// User confirmation provider, called synchronously by the [`Gate`]
pub trait Approver {
    /// Present a page, returning `false` to reject the transaction
    fn review(&mut self, page: &Page) -> bool;

    /// Request the final decision, returning `true` to approve signing
    fn decide(&mut self) -> bool;
}

impl<T: Approver> Approver for &mut T {
    fn review(&mut self, page: &Page) -> bool {
        T::review(self, page)
    }

    fn decide(&mut self) -> bool {
        T::decide(self)
    }
}

/// Ordered transaction summary for review
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Summary {
    pages: Vec<Page, MAX_PAGES>,
}

impl Summary {
    /// Render a transaction for review on the provided network
    pub fn build(tx: &Transaction, magic: NetworkMagic) -> Result<Self, Error> {
        let mut s = Self::default();

        s.push(Page::new("Review", "Transaction")?)?;

        match tx.script_kind() {
            ScriptKind::Transfer {
                token, amount, to, ..
            } => {
                let to = fmt_script_hash(to).ok_or(Error::ConfirmationFailed)?;
                s.push(Page {
                    title: "Destination",
                    value: to,
                })?;

                let mut buff = [0u8; 32];
                let amount =
                    fmt_token_val(amount, token, &mut buff).ok_or(Error::DisplayTransferAmount)?;
                s.push(Page::new("Amount", amount)?)?;
            }
            ScriptKind::Vote { vote_to, .. } => {
                let page = match vote_to {
                    Some(k) => Page {
                        title: "Vote to",
                        value: fmt_hex(k).ok_or(Error::ConfirmationFailed)?,
                    },
                    None => Page::new("Vote to", "Remove vote")?,
                };
                s.push(page)?;
            }
            ScriptKind::Other => {
                let mut value = PageValue::new();
                write!(value, "Contract call ({} bytes)", tx.script.len())
                    .map_err(|_| Error::ConfirmationFailed)?;
                s.push(Page {
                    title: "Script",
                    value,
                })?;
            }
        }

        s.push(Page::new("Target network", magic)?)?;

        let system_fee = fmt_gas_fee(tx.system_fee).ok_or(Error::DisplaySystemFee)?;
        s.push(Page {
            title: "System fee",
            value: system_fee,
        })?;

        let network_fee = fmt_gas_fee(tx.network_fee).ok_or(Error::DisplayNetworkFee)?;
        s.push(Page {
            title: "Network fee",
            value: network_fee,
        })?;

        let total_fee = tx
            .system_fee
            .checked_add(tx.network_fee)
            .and_then(fmt_gas_fee::<PAGE_VALUE_LEN>)
            .ok_or(Error::DisplayTotalFee)?;
        s.push(Page {
            title: "Total fees",
            value: total_fee,
        })?;

        s.push(Page::new("Valid until height", tx.valid_until_block)?)?;

        let n = tx.signers.len();
        for (i, signer) in tx.signers.iter().enumerate() {
            let mut value = PageValue::new();
            write!(value, "{} of {}", i + 1, n).map_err(|_| Error::ConfirmationFailed)?;
            s.push(Page {
                title: "Signer",
                value,
            })?;

            let account = fmt_script_hash(signer.account).ok_or(Error::ConfirmationFailed)?;
            s.push(Page {
                title: "Account",
                value: account,
            })?;

            s.push(Page::new("Scope", signer.scope)?)?;

            for c in &signer.allowed_contracts {
                let value = fmt_script_hash(c).ok_or(Error::ConfirmationFailed)?;
                s.push(Page {
                    title: "Allowed contract",
                    value,
                })?;
            }

            for g in &signer.allowed_groups {
                let value = fmt_hex(&g[..]).ok_or(Error::ConfirmationFailed)?;
                s.push(Page {
                    title: "Allowed group",
                    value,
                })?;
            }
        }

        if tx.is_high_priority() {
            s.push(Page::new("Priority", "High")?)?;
        }

        Ok(s)
    }

    /// Pages in presentation order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Find the first page with the provided title
    pub fn find(&self, title: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.title == title)
    }

    fn push(&mut self, p: Page) -> Result<(), Error> {
        self.pages.push(p).map_err(|_| Error::ConfirmationFailed)
    }
}

/// Confirmation state
#[derive(Copy, Clone, PartialEq, Debug, Display)]
pub enum GateState {
    /// Presenting the page at the provided index
    Review(usize),
    /// All pages reviewed, awaiting decision
    Decision,
    Approved,
    Rejected,
}

/// Sequential confirmation over a [`Summary`]
#[derive(Debug)]
pub struct Gate<'a> {
    summary: &'a Summary,
    state: GateState,
}

impl<'a> Gate<'a> {
    pub fn new(summary: &'a Summary) -> Self {
        Self {
            summary,
            state: GateState::Review(0),
        }
    }

    /// Fetch current state
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Advance the gate by a single user interaction
    pub fn step<A: Approver>(&mut self, approver: &mut A) -> GateState {
        self.state = match self.state {
            GateState::Review(i) => match self.summary.pages.get(i) {
                Some(p) if approver.review(p) => GateState::Review(i + 1),
                Some(_) => GateState::Rejected,
                None => GateState::Decision,
            },
            GateState::Decision => match approver.decide() {
                true => GateState::Approved,
                false => GateState::Rejected,
            },
            s => s,
        };

        self.state
    }

    /// Run the gate to completion, returning whether signing was approved
    pub fn run<A: Approver>(mut self, approver: &mut A) -> bool {
        loop {
            match self.step(approver) {
                GateState::Approved => return true,
                GateState::Rejected => return false,
                _ => (),
            }
        }
    }
}
