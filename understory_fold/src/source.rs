// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The data source contract.

/// Content type of a view, used to key view reuse.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ViewType {
    /// Views of this kind are never pooled for reuse.
    Ignore,
    /// Views with equal kinds are interchangeable for reuse.
    Kind(u32),
}

/// An indexable provider of item content.
///
/// Positions passed to the source are always in `0..count()`.
///
/// # Preconditions
///
/// A view handed back through `reusable` was produced for the same
/// [`ViewType`] that [`FoldSource::view_type`] reports for the new position.
/// A source whose types change for a position without a data change
/// notification breaks that pairing, and the resulting reuse is unspecified.
///
/// Only a few detached views are kept for reuse, across all kinds, so a
/// source with many distinct kinds mostly creates fresh views.
pub trait FoldSource {
    /// Content view handle.
    type View;

    /// Number of items.
    fn count(&self) -> usize;

    /// Content type of the item at `position`.
    fn view_type(&self, position: usize) -> ViewType;

    /// Produce the view for `position`, optionally rebinding `reusable`, a view
    /// of the same type that is no longer attached to any item.
    fn view(&mut self, position: usize, reusable: Option<Self::View>) -> Self::View;

    /// Called when `view` is detached from its item, before it is pooled for
    /// reuse or dropped.
    fn recycle(&mut self, view: &mut Self::View) {
        let _ = view;
    }
}
