// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod agents;
pub mod categories;
pub mod sales;
pub mod ledger;
pub mod reports;
pub mod rules;
pub mod exporter;
pub mod config;
pub mod doctor;
