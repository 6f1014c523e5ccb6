//! Core functionality for talos.
//!
//! This crate defines the contracts a robot program is written against: the
//! [`chassis`] motion surface, [`pneumatics`] actuators, and the driver's
//! [`gamepad`], along with the [`geometry`] and [`config`] vocabulary those
//! contracts share. Hardware backends and simulators implement the contracts;
//! everything above them stays portable.
//!
//! The [`competition`] module tracks the field controller's lifecycle and
//! hands the program to the right phase handler as the match progresses.

pub mod chassis;
pub mod competition;
pub mod config;
pub mod gamepad;
pub mod geometry;
pub mod pneumatics;
