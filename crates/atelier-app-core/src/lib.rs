// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared host services for Atelier tools: config storage, studio prefs and
//! toast notifications. Editors and drivers depend on these ports instead of
//! touching global state directly.

pub mod config;
pub mod config_port;
pub mod prefs;
pub mod toast;
