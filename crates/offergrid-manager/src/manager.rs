//! Resource manager — assigns pooled offers to tasks.
//!
//! Assignment is first-fit: the pool is scanned in its current order and
//! the first offer that passes the task's filters and can cover every
//! scalar demand wins. There is no attempt to minimize fragmentation.

use std::sync::Arc;

use tracing::debug;

use offergrid_constraints::ConstraintRegistry;
use offergrid_core::{
    CPUS, DISK, DiskInfo, Filter, FilterMode, MEM, ManagerConfig, Offer, Strategy, TaskInfo,
};

use crate::error::{ManagerError, ManagerResult};
use crate::filter;
use crate::pool::{OfferPool, ResourceOffer};

/// Offer intake, constraint registration, and assignment.
///
/// `add_offers`, `assign` and `offers` are driven by one scheduling loop
/// and take `&mut self`. Filter registration only needs `&self`.
pub trait ResourceManager {
    /// Replace the pool with a new batch of offers.
    fn add_offers(&mut self, offers: Vec<Arc<Offer>>);

    /// Whether any offer is left in the pool.
    fn has_resources(&self) -> bool;

    /// Register filters (and optionally a strategy) for a task.
    fn add_filter(&self, task: &TaskInfo, filters: &[Filter]) -> ManagerResult<()>;

    /// Drop every filter and the strategy registered for a task.
    fn clear_filters(&self, task: &TaskInfo);

    /// Match the task to an offer, debiting its resources.
    fn assign(&mut self, task: &TaskInfo) -> ManagerResult<Arc<Offer>>;

    /// Offers in the pool that no task has been matched to.
    fn offers(&self) -> Vec<Arc<Offer>>;
}

/// What a task asks of a single offer.
#[derive(Debug, Default)]
struct Demand {
    cpu: f64,
    mem: f64,
    disk: Option<DiskInfo>,
}

impl Demand {
    fn from_task(task: &TaskInfo) -> Self {
        let mut demand = Demand::default();
        for resource in &task.resources {
            match resource.name.as_str() {
                CPUS => demand.cpu += resource.scalar_value(),
                MEM => demand.mem += resource.scalar_value(),
                DISK => {
                    if let Some(disk) = &resource.disk {
                        demand.disk = Some(disk.clone());
                    }
                }
                _ => {}
            }
        }
        demand
    }

    fn fits(&self, offer: &ResourceOffer) -> bool {
        offer.cpu - self.cpu >= 0.0 && offer.mem - self.mem >= 0.0
    }

    /// Debit scalars and claim the disk. Only called after `fits`.
    fn debit(&self, offer: &mut ResourceOffer) {
        offer.cpu -= self.cpu;
        offer.mem -= self.mem;
        // No disk accounting: the descriptor is replaced wholesale.
        if let Some(disk) = &self.disk {
            offer.disk = Some(disk.clone());
        }
    }
}

/// The default [`ResourceManager`].
pub struct DefaultResourceManager {
    pool: OfferPool,
    registry: Arc<ConstraintRegistry>,
    filter_mode: FilterMode,
    default_strategy: Strategy,
}

impl DefaultResourceManager {
    /// Create a manager with the default configuration.
    pub fn new(registry: Arc<ConstraintRegistry>) -> Self {
        Self::with_config(registry, &ManagerConfig::default())
    }

    pub fn with_config(registry: Arc<ConstraintRegistry>, config: &ManagerConfig) -> Self {
        Self {
            pool: OfferPool::new(),
            registry,
            filter_mode: config.allocator.filter_mode,
            default_strategy: config.allocator.default_strategy,
        }
    }

    /// The current offer pool (for diagnostics).
    pub fn pool(&self) -> &OfferPool {
        &self.pool
    }

    pub fn registry(&self) -> &Arc<ConstraintRegistry> {
        &self.registry
    }
}

impl ResourceManager for DefaultResourceManager {
    fn add_offers(&mut self, offers: Vec<Arc<Offer>>) {
        // Always start over so declined offers never linger.
        self.pool.replace(offers);
        debug!(offers = self.pool.len(), "offer batch received");
    }

    fn has_resources(&self) -> bool {
        !self.pool.is_empty()
    }

    fn add_filter(&self, task: &TaskInfo, filters: &[Filter]) -> ManagerResult<()> {
        self.registry.add_filter(&task.name, filters)?;
        Ok(())
    }

    fn clear_filters(&self, task: &TaskInfo) {
        self.registry.clear_filters(&task.name);
    }

    fn assign(&mut self, task: &TaskInfo) -> ManagerResult<Arc<Offer>> {
        let filters = self.registry.filters(&task.name);
        let strategy = self
            .registry
            .strategy(&task.name)
            .unwrap_or(self.default_strategy);
        let demand = Demand::from_task(task);

        let mut matched = None;
        for (index, entry) in self.pool.iter_mut().enumerate() {
            if let Some(filters) = &filters {
                if !filter::admits(self.filter_mode, filters, &entry.offer().attributes) {
                    continue;
                }
            }
            if !demand.fits(entry) {
                continue;
            }

            demand.debit(entry);
            entry.accepted = true;
            matched = Some((index, entry.offer().clone(), entry.is_exhausted()));
            break;
        }

        let Some((index, offer, exhausted)) = matched else {
            return Err(ManagerError::NoSuitableOffer(task.name.clone()));
        };

        let retained = strategy == Strategy::Mux && !exhausted;
        if !retained {
            self.pool.swap_remove(index);
        }

        debug!(
            task = %task.name,
            offer = %offer.id,
            %strategy,
            retained,
            "assigned offer"
        );
        Ok(offer)
    }

    fn offers(&self) -> Vec<Arc<Offer>> {
        self.pool.unaccepted()
    }
}
