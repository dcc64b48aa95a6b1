// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! All queries use Diesel DSL. Lookups by id return `Ok(None)` when the row
//! does not exist; callers decide whether absence is an error.
//!
//! ## Module Organization
//!
//! - `applications`: Application rows, read views, duplicate detection, summary
//! - `audit`: Audit timeline
//! - `documents`: Document rows
//! - `users`: Staff accounts
//! - `vehicles`: Vehicle lookup and listing

pub mod applications;
pub mod audit;
pub mod documents;
pub mod users;
pub mod vehicles;
