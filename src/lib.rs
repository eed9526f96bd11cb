//! KSAO Sim - Leadership emergence in a team with distributed skills
//!
//! A small team must cover a set of subtasks, each needing specific KSAO
//! tags. Every turn one member, drawn by participation weight, attempts a
//! subtask; outcomes feed a leadership-perception matrix and an entropy
//! measure of how concentrated leadership has become.

pub mod core;
pub mod simulation;
pub mod ui;
