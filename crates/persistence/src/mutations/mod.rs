// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Mutations use Diesel DSL and reach backend-specific helpers only through
//! the `PersistenceBackend` trait. None of them opens a transaction: they are
//! called through [`crate::Transaction`], which owns the transaction scope.
//!
//! ## Module Organization
//!
//! - `applications`: Intake, guarded lifecycle updates, deletion
//! - `audit`: Audit event persistence
//! - `documents`: Document rows
//! - `users`: Staff accounts
//! - `vehicles`: Vehicle resolve-or-create

pub mod applications;
pub mod audit;
pub mod documents;
pub mod users;
pub mod vehicles;

pub use applications::SubmitOutcome;
