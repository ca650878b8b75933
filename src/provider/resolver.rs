//! ACL resolution engine
//!
//! Resolves the ACL of an object identity:
//! 1. Fetch the entries, filtered to the requesting security identities if any
//! 2. Materialize the referenced security identities once per call
//! 3. Locate the hierarchy record
//! 4. Resolve the parent's full ACL, tolerating parents without entries
//! 5. Assemble

use crate::acl::{Acl, ObjectIdentity, SecurityIdentity, SharedStrategy, assemble};
use crate::config::ProviderConfig;
use crate::error::{AclError, AclNotFound, AclResult};
use crate::provider::materializer::SidArena;
use crate::store::AclStore;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

/// Outcome of resolving one level of the hierarchy
#[derive(Debug)]
enum Lookup {
    Found(Acl),
    NotFound(AclNotFound),
}

/// Resolves ACLs from a storage collaborator
///
/// Every call owns its own reads and materialization cache; the provider
/// itself holds no mutable state and can be shared freely.
pub struct AclProvider<S: ?Sized> {
    store: Arc<S>,
    strategy: Option<SharedStrategy>,
    max_depth: Option<usize>,
    batch_concurrency: usize,
}

impl<S: AclStore + ?Sized> AclProvider<S> {
    /// Create a provider with default settings
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, &ProviderConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: &ProviderConfig) -> Self {
        Self {
            store,
            strategy: None,
            max_depth: config.max_depth,
            batch_concurrency: config.batch_concurrency.max(1),
        }
    }

    /// Attach the strategy every assembled ACL will carry
    pub fn with_strategy(mut self, strategy: SharedStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Resolve the ACL of `object_identity`
    ///
    /// With an empty `sids` all entries are loaded. Otherwise only entries of
    /// the given security identities are, while ancestors are always resolved
    /// in full.
    #[instrument(skip_all, fields(object = %object_identity, sids = sids.len()))]
    pub async fn resolve(
        &self,
        object_identity: &ObjectIdentity,
        sids: &[SecurityIdentity],
    ) -> AclResult<Acl> {
        let mut arena = SidArena::new();
        let mut visited = HashSet::new();

        match self
            .lookup(object_identity, sids, &mut arena, &mut visited, 0)
            .await?
        {
            Lookup::Found(acl) => {
                debug!(
                    entries = acl.entry_count(),
                    materialized = arena.len(),
                    "Resolved ACL"
                );
                Ok(acl)
            }
            Lookup::NotFound(not_found) => {
                debug!(reason = ?not_found.reason, "No ACL found");
                Err(not_found.into())
            }
        }
    }

    /// Resolve the ACLs of several object identities
    ///
    /// All or nothing: the first identity (in input order) that fails aborts
    /// the batch with its error.
    #[instrument(skip_all, fields(objects = object_identities.len(), sids = sids.len()))]
    pub async fn resolve_many(
        &self,
        object_identities: &[ObjectIdentity],
        sids: &[SecurityIdentity],
    ) -> AclResult<HashMap<ObjectIdentity, Acl>> {
        stream::iter(object_identities)
            .map(|object_identity| async move {
                let acl = self.resolve(object_identity, sids).await?;
                Ok::<_, AclError>((object_identity.clone(), acl))
            })
            .buffered(self.batch_concurrency)
            .try_collect()
            .await
    }

    /// Object identities below `parent`
    ///
    /// Only direct children when `direct_only`, otherwise all descendants.
    /// An unregistered parent has no children.
    #[instrument(skip_all, fields(parent = %parent, direct_only = direct_only))]
    pub async fn children(
        &self,
        parent: &ObjectIdentity,
        direct_only: bool,
    ) -> AclResult<Vec<ObjectIdentity>> {
        let Some(record) = self.store.locate(parent).await? else {
            debug!("Parent is not registered");
            return Ok(Vec::new());
        };

        let children = self.store.children(&record, direct_only).await?;
        Ok(children
            .into_iter()
            .map(|record| record.object_identity)
            .collect())
    }

    fn lookup<'a>(
        &'a self,
        object_identity: &'a ObjectIdentity,
        sids: &'a [SecurityIdentity],
        arena: &'a mut SidArena,
        visited: &'a mut HashSet<u64>,
        depth: usize,
    ) -> BoxFuture<'a, AclResult<Lookup>> {
        Box::pin(async move {
            if let Some(max_depth) = self.max_depth
                && depth > max_depth
            {
                return Err(AclError::DepthExceeded {
                    object_identity: object_identity.clone(),
                    max_depth,
                });
            }

            let filtered = !sids.is_empty();
            let stored = self
                .store
                .entries_for(object_identity, sids, filtered)
                .await?;

            if stored.is_empty() {
                return Ok(Lookup::NotFound(AclNotFound::for_filter(
                    object_identity.clone(),
                    filtered,
                )));
            }

            let (entries, identities) = arena.materialize_entries(&stored);

            let Some(record) = self.store.locate(object_identity).await? else {
                warn!(object = %object_identity, "Entries found without a hierarchy record");
                return Err(AclError::InconsistentHierarchy {
                    object_identity: object_identity.clone(),
                });
            };
            visited.insert(record.id);

            let parent = match record.parent_id {
                None => None,
                Some(parent_id) => {
                    if visited.contains(&parent_id) {
                        warn!(object = %object_identity, parent_id, "Cyclic parent link");
                        return Err(AclError::CyclicHierarchy {
                            object_identity: object_identity.clone(),
                            parent_id,
                        });
                    }

                    let Some(parent_record) = self.store.parent(&record).await? else {
                        warn!(object = %object_identity, parent_id, "Dangling parent link");
                        return Err(AclError::DanglingParent {
                            object_identity: object_identity.clone(),
                            parent_id,
                        });
                    };

                    trace!(
                        object = %object_identity,
                        parent = %parent_record.object_identity,
                        depth,
                        "Resolving parent ACL"
                    );

                    match self
                        .lookup(
                            &parent_record.object_identity,
                            &[],
                            &mut *arena,
                            &mut *visited,
                            depth + 1,
                        )
                        .await?
                    {
                        Lookup::Found(acl) => Some(Arc::new(acl)),
                        // parents may exist before any entry is attached to them
                        Lookup::NotFound(not_found) => {
                            debug!(
                                parent = %not_found.object_identity,
                                "Parent has no ACL yet, continuing without it"
                            );
                            None
                        }
                    }
                }
            };

            Ok(Lookup::Found(assemble(
                entries,
                object_identity.clone(),
                identities,
                parent,
                record.entries_inheriting,
                self.strategy.clone(),
            )))
        })
    }
}
