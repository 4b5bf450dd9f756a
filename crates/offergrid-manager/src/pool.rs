//! Offer pool — the live set of offers available for assignment.

use std::sync::Arc;

use offergrid_core::{CPUS, DISK, DiskInfo, MEM, Offer};

/// An offer projected onto the quantities the allocator consumes.
///
/// `cpu` and `mem` are debited in place as tasks are matched and never
/// go negative.
#[derive(Debug, Clone)]
pub struct ResourceOffer {
    offer: Arc<Offer>,
    pub(crate) cpu: f64,
    pub(crate) mem: f64,
    pub(crate) disk: Option<DiskInfo>,
    pub(crate) accepted: bool,
}

impl ResourceOffer {
    /// Project a raw offer. Only `cpus`, `mem` and `disk` line items are
    /// read; a repeated name overwrites the earlier one.
    pub fn from_offer(offer: Arc<Offer>) -> Self {
        let mut cpu = 0.0;
        let mut mem = 0.0;
        let mut disk = None;
        for resource in &offer.resources {
            match resource.name.as_str() {
                CPUS => cpu = resource.scalar_value(),
                MEM => mem = resource.scalar_value(),
                DISK => disk = resource.disk.clone(),
                _ => {}
            }
        }
        Self {
            offer,
            cpu,
            mem,
            disk,
            accepted: false,
        }
    }

    pub fn offer(&self) -> &Arc<Offer> {
        &self.offer
    }

    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    pub fn mem(&self) -> f64 {
        self.mem
    }

    pub fn disk(&self) -> Option<&DiskInfo> {
        self.disk.as_ref()
    }

    /// Whether a task has been matched to this offer in the current batch.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Exhausted on at least one scalar axis.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.cpu == 0.0 || self.mem == 0.0
    }
}

/// Owned, indexable sequence of offers. Order is not preserved across
/// removals.
#[derive(Debug, Default)]
pub struct OfferPool {
    offers: Vec<ResourceOffer>,
}

impl OfferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every current entry and rebuild from `offers`, preserving
    /// input order.
    pub fn replace(&mut self, offers: Vec<Arc<Offer>>) {
        self.offers = offers.into_iter().map(ResourceOffer::from_offer).collect();
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResourceOffer> {
        self.offers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceOffer> {
        self.offers.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ResourceOffer> {
        self.offers.iter_mut()
    }

    /// Remove the entry at `index` in O(1): swap it with the last entry,
    /// then shrink by one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn swap_remove(&mut self, index: usize) -> ResourceOffer {
        self.offers.swap_remove(index)
    }

    /// Raw offers not matched to any task, for declining.
    pub fn unaccepted(&self) -> Vec<Arc<Offer>> {
        self.offers
            .iter()
            .filter(|o| !o.accepted)
            .map(|o| o.offer.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offergrid_core::Resource;

    fn make_offer(id: &str, cpu: f64, mem: f64) -> Arc<Offer> {
        Arc::new(
            Offer::new(id)
                .with_resource(Resource::cpus(cpu))
                .with_resource(Resource::mem(mem)),
        )
    }

    fn ids(pool: &OfferPool) -> Vec<String> {
        pool.iter().map(|o| o.offer().id.0.clone()).collect()
    }

    #[test]
    fn projects_named_resources_only() {
        let offer = Offer::new("o1")
            .with_resource(Resource::cpus(2.0))
            .with_resource(Resource::mem(512.0))
            .with_resource(Resource::scalar("gpus", 1.0))
            .with_resource(Resource::disk(DiskInfo {
                container_path: Some("/data".to_string()),
                ..DiskInfo::default()
            }));

        let projected = ResourceOffer::from_offer(Arc::new(offer));

        assert_eq!(projected.cpu(), 2.0);
        assert_eq!(projected.mem(), 512.0);
        assert_eq!(
            projected.disk().and_then(|d| d.container_path.as_deref()),
            Some("/data")
        );
        assert!(!projected.is_accepted());
    }

    #[test]
    fn missing_scalars_project_to_zero() {
        let projected = ResourceOffer::from_offer(Arc::new(Offer::new("bare")));
        assert_eq!(projected.cpu(), 0.0);
        assert_eq!(projected.mem(), 0.0);
        assert!(projected.disk().is_none());
        assert!(projected.is_exhausted());
    }

    #[test]
    fn replace_discards_previous_batch_and_keeps_order() {
        let mut pool = OfferPool::new();
        pool.replace(vec![make_offer("a", 1.0, 1.0)]);

        pool.replace(vec![
            make_offer("b", 1.0, 1.0),
            make_offer("c", 1.0, 1.0),
            make_offer("d", 1.0, 1.0),
        ]);
        assert_eq!(ids(&pool), vec!["b", "c", "d"]);

        pool.replace(Vec::new());
        assert!(pool.is_empty());
    }

    #[test]
    fn swap_remove_moves_last_into_hole() {
        let mut pool = OfferPool::new();
        pool.replace(vec![
            make_offer("a", 1.0, 1.0),
            make_offer("b", 1.0, 1.0),
            make_offer("c", 1.0, 1.0),
        ]);

        let removed = pool.swap_remove(0);

        assert_eq!(removed.offer().id.0, "a");
        assert_eq!(ids(&pool), vec!["c", "b"]);
    }

    #[test]
    fn swap_remove_last_entry() {
        let mut pool = OfferPool::new();
        pool.replace(vec![make_offer("a", 1.0, 1.0), make_offer("b", 1.0, 1.0)]);

        pool.swap_remove(1);
        assert_eq!(ids(&pool), vec!["a"]);

        pool.swap_remove(0);
        assert!(pool.is_empty());
    }

    #[test]
    fn unaccepted_skips_matched_offers() {
        let mut pool = OfferPool::new();
        pool.replace(vec![make_offer("a", 1.0, 1.0), make_offer("b", 1.0, 1.0)]);
        pool.iter_mut().next().unwrap().accepted = true;

        let left: Vec<String> = pool.unaccepted().iter().map(|o| o.id.0.clone()).collect();
        assert_eq!(left, vec!["b"]);
    }
}
