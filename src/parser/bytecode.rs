use mirror_types::EntityId;

/// Fetches the contents of a file holding contract bytecode.
pub trait ContractBytecodeSource: Send + Sync {
    fn contract_bytecode(&self, file_id: EntityId) -> Option<Vec<u8>>;
}

impl<F> ContractBytecodeSource for F
where
    F: Fn(EntityId) -> Option<Vec<u8>> + Send + Sync,
{
    fn contract_bytecode(&self, file_id: EntityId) -> Option<Vec<u8>> {
        self(file_id)
    }
}

/// Source that never finds bytecode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBytecodeSource;

impl ContractBytecodeSource for NoBytecodeSource {
    fn contract_bytecode(&self, _file_id: EntityId) -> Option<Vec<u8>> {
        None
    }
}
