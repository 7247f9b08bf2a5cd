//! [`Sequence`] definitions.

use common::define_kind;

#[cfg(doc)]
use crate::domain::{Invoice, SalesOrder, Tenant};
use crate::domain::{tenant, Owned};

/// Monotonic counter numbering documents of one [`Kind`] within a
/// [`Tenant`].
///
/// Stored alongside the documents it numbers, so advancing it takes part in
/// the same transaction as persisting the numbered document.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Sequence {
    /// ID of the [`Tenant`] this [`Sequence`] belongs to.
    pub tenant_id: tenant::Id,

    /// [`Kind`] of documents numbered by this [`Sequence`].
    pub kind: Kind,

    /// Last issued number, or the one preceding the first number if none
    /// was issued yet.
    pub last: u32,
}

impl Sequence {
    /// Resumes a [`Sequence`] right after the `existing_max` number of the
    /// already stored documents, or right before the `first` number when
    /// there are none (or they're all below it).
    ///
    /// `first` of `0` is treated as `1`.
    #[must_use]
    pub fn resume(
        tenant_id: tenant::Id,
        kind: Kind,
        first: u32,
        existing_max: Option<u32>,
    ) -> Self {
        let before_first = first.saturating_sub(1);
        Self {
            tenant_id,
            kind,
            last: existing_max.map_or(before_first, |m| m.max(before_first)),
        }
    }

    /// Advances this [`Sequence`], returning the newly issued number.
    ///
    /// [`None`] is returned once the numbers are exhausted.
    pub fn advance(&mut self) -> Option<u32> {
        self.last = self.last.checked_add(1)?;
        Some(self.last)
    }
}

impl Owned for Sequence {
    fn tenant_id(&self) -> tenant::Id {
        self.tenant_id
    }
}

define_kind! {
    #[doc = "Kind of documents numbered by a [`Sequence`]."]
    enum Kind {
        #[doc = "[`SalesOrder`] numbers."]
        SalesOrder,

        #[doc = "[`Invoice`] numbers."]
        Invoice,
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::tenant;

    use super::{Kind, Sequence};

    #[test]
    fn starts_from_first() {
        let mut seq =
            Sequence::resume(tenant::Id::new(), Kind::Invoice, 10_001, None);

        assert_eq!(seq.advance(), Some(10_001));
        assert_eq!(seq.advance(), Some(10_002));
    }

    #[test]
    fn continues_after_existing() {
        let mut seq =
            Sequence::resume(tenant::Id::new(), Kind::SalesOrder, 1, Some(41));

        assert_eq!(seq.advance(), Some(42));
    }

    #[test]
    fn never_goes_below_first() {
        let tenant_id = tenant::Id::new();
        let mut seq =
            Sequence::resume(tenant_id, Kind::SalesOrder, 1001, Some(3));

        assert_eq!(seq.advance(), Some(1001));
    }

    #[test]
    fn zero_first_means_one() {
        let mut seq =
            Sequence::resume(tenant::Id::new(), Kind::SalesOrder, 0, None);

        assert_eq!(seq.advance(), Some(1));
    }

    #[test]
    fn exhausts() {
        let mut seq = Sequence::resume(
            tenant::Id::new(),
            Kind::Invoice,
            1,
            Some(u32::MAX),
        );

        assert_eq!(seq.advance(), None);
    }
}
