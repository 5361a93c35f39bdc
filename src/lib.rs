//! # plumb
//!
//! An indentation and style checker for block-structured scripting languages whose compound
//! statements are delimited by keyword/`end` pairs.
//!
//! File Layout
//!
//! src/plumb
//!   ├── token        Token and LineView types shared by every stage
//!   ├── lexing       The logos based tokenizer feeding the dispatcher
//!   ├── dispatch     Line batching and event delivery to rule observers
//!   ├── indentation  The indentation expectation state machine
//!   ├── rules        The rule observer contract and the shipped rules
//!   ├── config       Style configuration (YAML, embedded defaults)
//!   ├── checker      Per-file and per-tree orchestration
//!   ├── discovery    Source file lookup below a directory
//!   ├── formats      Report rendering for the command line
//!   └── logging      tracing subscriber setup for the binary
//!
//! For test helpers, see the [testing module](plumb::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod plumb;
