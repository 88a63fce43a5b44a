//! Kernel Source Tree Module
//!
//! Handles interactions with the Linux kernel source tree:
//! - Git checkout of the analyzed revision
//! - Kconfig preparation for traced builds
//! - Build target classification

pub mod git;
pub mod kconfig;
pub mod target;
