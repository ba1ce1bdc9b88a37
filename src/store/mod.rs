// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Filesystem layer: `INFOPATH` resolution, decompression, document cache.

mod cache;
mod locate;

#[cfg(test)]
mod tests;

pub use cache::DocumentCache;
pub use locate::{InfoPath, LocateError, ResolvedFile};
