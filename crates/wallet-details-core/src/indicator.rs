//! Progress indicators that a transaction refresh finishes when it settles.
//!
//! A modal loader and a pull-to-refresh control are finished through
//! different calls; [`RefreshIndicator`] hides that behind `finish`. Handles
//! are consumed by value so an indicator can only be finished once.

pub trait LoaderHandle {
    fn dismiss(self: Box<Self>);
}

pub trait RefresherHandle {
    fn complete(self: Box<Self>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Loader,
    Refresher,
}

pub enum RefreshIndicator {
    Loader(Box<dyn LoaderHandle>),
    Refresher(Box<dyn RefresherHandle>),
}

impl RefreshIndicator {
    pub fn kind(&self) -> IndicatorKind {
        match self {
            RefreshIndicator::Loader(_) => IndicatorKind::Loader,
            RefreshIndicator::Refresher(_) => IndicatorKind::Refresher,
        }
    }

    pub fn finish(self) {
        match self {
            RefreshIndicator::Loader(loader) => loader.dismiss(),
            RefreshIndicator::Refresher(refresher) => refresher.complete(),
        }
    }
}

impl std::fmt::Debug for RefreshIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RefreshIndicator").field(&self.kind()).finish()
    }
}
