//! Execution order of the allowance hooks attached to a transfer.
//!
//! A transfer can invoke allowance hooks that run once before the transfer
//! and hooks that run both before and after it. The network executes them as
//! child contract calls in a fixed order: every pre-only hook in the order
//! it was attached, then each pre/post hook twice in a row. Child calls carry
//! their index in that queue.

use mirror_protocol::body::{AllowanceHookCall, CryptoTransferBody, HookCallType};
use mirror_protocol::AccountId;
use mirror_types::EntityId;

use crate::parser::resolver::EntityIdResolver;

/// A hook identified by its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId {
    pub hook_id: i64,
    pub owner_id: EntityId,
}

impl HookId {
    pub fn new(hook_id: i64, owner_id: EntityId) -> Self {
        Self { hook_id, owner_id }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookExecutionCollector {
    allow_exec: Vec<HookId>,
    allow_pre_exec: Vec<HookId>,
    allow_post_exec: Vec<HookId>,
}

impl HookExecutionCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the allowance hook calls of a transfer body.
    ///
    /// Owners that cannot be resolved keep their queue position as [`EntityId::EMPTY`].
    pub fn from_transfer(body: &CryptoTransferBody, resolver: &dyn EntityIdResolver) -> Self {
        let mut collector = Self::new();
        let mut add = |owner: &AccountId, call: Option<&AllowanceHookCall>| {
            if let Some(call) = call {
                let owner_id = resolver.lookup_account(owner).unwrap_or(EntityId::EMPTY);
                collector.add_call(HookId::new(call.hook_id, owner_id), call.call_type);
            }
        };

        for transfer in &body.transfers {
            add(&transfer.account_id, transfer.allowance_hook.as_ref());
        }
        for token_transfers in &body.token_transfers {
            for transfer in &token_transfers.transfers {
                add(&transfer.account_id, transfer.allowance_hook.as_ref());
            }
            for nft in &token_transfers.nft_transfers {
                add(&nft.sender_account_id, nft.sender_allowance_hook.as_ref());
                add(&nft.receiver_account_id, nft.receiver_allowance_hook.as_ref());
            }
        }

        collector
    }

    pub fn add_call(&mut self, hook: HookId, call_type: HookCallType) {
        match call_type {
            HookCallType::PreTx => self.add_allow_exec(hook),
            HookCallType::PrePostTx => {
                self.add_allow_pre_exec(hook);
                self.add_allow_post_exec(hook);
            }
        }
    }

    pub fn add_allow_exec(&mut self, hook: HookId) {
        push_unique(&mut self.allow_exec, hook);
    }

    pub fn add_allow_pre_exec(&mut self, hook: HookId) {
        push_unique(&mut self.allow_pre_exec, hook);
    }

    pub fn add_allow_post_exec(&mut self, hook: HookId) {
        push_unique(&mut self.allow_post_exec, hook);
    }

    pub fn is_empty(&self) -> bool {
        self.allow_exec.is_empty() && self.allow_pre_exec.is_empty() && self.allow_post_exec.is_empty()
    }

    /// Every distinct hook owner, in queue order.
    pub fn owners(&self) -> Vec<EntityId> {
        let mut owners = Vec::new();
        for hook in self.execution_queue() {
            if !owners.contains(&hook.owner_id) {
                owners.push(hook.owner_id);
            }
        }
        owners
    }

    /// The order in which the hooks execute.
    pub fn execution_queue(&self) -> Vec<HookId> {
        let mut queue = self.allow_exec.clone();
        for pre in &self.allow_pre_exec {
            queue.push(*pre);
            if self.allow_post_exec.contains(pre) {
                queue.push(*pre);
            }
        }
        queue.extend(
            self.allow_post_exec
                .iter()
                .filter(|post| !self.allow_pre_exec.contains(post)),
        );
        queue
    }

    /// The hook executed by the child call at `index`.
    pub fn hook_at(&self, index: usize) -> Option<HookId> {
        self.execution_queue().get(index).copied()
    }
}

fn push_unique(hooks: &mut Vec<HookId>, hook: HookId) {
    if !hooks.contains(&hook) {
        hooks.push(hook);
    }
}

#[cfg(test)]
mod tests {
    use mirror_protocol::body::{AccountAmount, NftTransfer, TokenTransferList};
    use mirror_test_utils::{account, alias_account, entity, token};

    use super::*;
    use crate::parser::resolver::InMemoryEntityIdResolver;

    fn hook(hook_id: i64, owner: i64) -> HookId {
        HookId::new(hook_id, entity(owner))
    }

    #[test]
    fn test_pre_post_hooks_run_back_to_back_after_exec_hooks() {
        let mut collector = HookExecutionCollector::new();
        collector.add_allow_exec(hook(1, 1001));
        collector.add_allow_pre_exec(hook(3, 1003));
        collector.add_allow_exec(hook(2, 1002));
        collector.add_allow_post_exec(hook(3, 1003));

        assert_eq!(
            collector.execution_queue(),
            vec![hook(1, 1001), hook(2, 1002), hook(3, 1003), hook(3, 1003)]
        );
        assert_eq!(collector.hook_at(3), Some(hook(3, 1003)));
        assert_eq!(collector.hook_at(4), None);
        assert_eq!(collector.owners(), vec![entity(1001), entity(1002), entity(1003)]);
    }

    #[test]
    fn test_pairs_are_not_interleaved() {
        let mut collector = HookExecutionCollector::new();
        collector.add_call(hook(5, 1), HookCallType::PrePostTx);
        collector.add_call(hook(6, 2), HookCallType::PrePostTx);
        collector.add_call(hook(5, 1), HookCallType::PrePostTx);

        assert_eq!(
            collector.execution_queue(),
            vec![hook(5, 1), hook(5, 1), hook(6, 2), hook(6, 2)]
        );
    }

    #[test]
    fn test_from_transfer() {
        let call = |hook_id, call_type| {
            Some(AllowanceHookCall {
                hook_id,
                call_type,
                gas_limit: 100_000,
                data: vec![],
            })
        };
        let body = CryptoTransferBody {
            transfers: vec![
                AccountAmount {
                    account_id: account(1001),
                    amount: -10,
                    allowance_hook: call(1, HookCallType::PrePostTx),
                    ..AccountAmount::default()
                },
                AccountAmount {
                    account_id: alias_account(&[3; 33]),
                    amount: 10,
                    allowance_hook: call(2, HookCallType::PreTx),
                    ..AccountAmount::default()
                },
            ],
            token_transfers: vec![TokenTransferList {
                token: token(5000),
                nft_transfers: vec![NftTransfer {
                    sender_account_id: account(1004),
                    receiver_account_id: account(1005),
                    serial_number: 1,
                    sender_allowance_hook: call(3, HookCallType::PreTx),
                    ..NftTransfer::default()
                }],
                ..TokenTransferList::default()
            }],
        };

        let collector = HookExecutionCollector::from_transfer(&body, &InMemoryEntityIdResolver::new());
        assert_eq!(
            collector.execution_queue(),
            vec![
                HookId::new(2, EntityId::EMPTY),
                hook(3, 1004),
                hook(1, 1001),
                hook(1, 1001)
            ]
        );
    }
}
