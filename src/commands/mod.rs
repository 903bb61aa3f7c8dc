// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod alerts;
pub mod budget;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod family;
pub mod planned;
pub mod recurring;
pub mod shopping;
pub mod summary;
pub mod transactions;
