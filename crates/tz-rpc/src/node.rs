//! Typed node endpoints on top of the gateway.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use tz_operation::ForgedOperation;

use crate::error::RpcError;
use crate::gateway::RpcGateway;
use crate::types::{AppliedOperation, BlockHeader, ContractInfo};

/// Validation pass holding manager operations in a block's operation lists.
pub const MANAGER_PASS: usize = 3;

const HEAD_CONTRACTS: &str = "chains/main/blocks/head/context/contracts";

impl RpcGateway {
    /// Header of the configured anchor block (`head~3` by default).
    pub async fn header(&self) -> Result<BlockHeader, RpcError> {
        let path = format!("chains/main/blocks/{}/header", self.config().header_block);
        self.get(&path).await
    }

    /// Current counter of an implicit account.
    pub async fn counter(&self, pkh: &str) -> Result<u64, RpcError> {
        let counter: String = self.get(&format!("{HEAD_CONTRACTS}/{pkh}/counter")).await?;
        counter
            .parse()
            .map_err(|_| RpcError::InvalidResponse(format!("counter {counter:?}")))
    }

    /// Revealed manager key, or `None` if the account is unrevealed.
    pub async fn manager_key(&self, pkh: &str) -> Result<Option<String>, RpcError> {
        self.get(&format!("{HEAD_CONTRACTS}/{pkh}/manager_key")).await
    }

    /// Balance in mutez.
    pub async fn balance(&self, pkh: &str) -> Result<String, RpcError> {
        self.get(&format!("{HEAD_CONTRACTS}/{pkh}/balance")).await
    }

    /// Balance, delegate and counter of a contract.
    pub async fn contract(&self, pkh: &str) -> Result<ContractInfo, RpcError> {
        self.get(&format!("{HEAD_CONTRACTS}/{pkh}")).await
    }

    /// Protocol constants at head.
    pub async fn constants(&self) -> Result<Value, RpcError> {
        self.get("chains/main/blocks/head/context/constants").await
    }

    /// Voting listings at head.
    pub async fn voting_listings(&self) -> Result<Value, RpcError> {
        self.get("chains/main/blocks/head/votes/listings").await
    }

    /// Operation hashes of a block, one list per validation pass.
    pub async fn operation_hashes(&self, level: u64) -> Result<Vec<Vec<String>>, RpcError> {
        self.get(&format!("chains/main/blocks/{level}/operation_hashes")).await
    }

    /// Operations of a block, one list per validation pass.
    pub async fn block_operations(&self, level: u64) -> Result<Vec<Vec<Value>>, RpcError> {
        self.get(&format!("chains/main/blocks/{level}/operations")).await
    }

    /// Forge an operation on the node, returning its hex bytes.
    ///
    /// The answer is untrusted until checked with
    /// [`verify_forge`](tz_operation::forge::verify_forge).
    pub async fn forge_operation<T: Serialize + ?Sized>(&self, op: &T) -> Result<String, RpcError> {
        self.post("chains/main/blocks/head/helpers/forge/operations", op).await
    }

    /// Dry-run an operation carrying a placeholder signature.
    pub async fn simulate_operation(
        &self,
        op: &ForgedOperation,
        chain_id: &str,
    ) -> Result<AppliedOperation, RpcError> {
        let body = json!({ "operation": op, "chain_id": chain_id });
        self.post(
            "chains/main/blocks/head/helpers/scripts/simulate_operation?version=1",
            &body,
        )
        .await
    }

    /// Preapply a signed operation.
    pub async fn preapply_operation(
        &self,
        op: &ForgedOperation,
    ) -> Result<Vec<AppliedOperation>, RpcError> {
        self.post("chains/main/blocks/head/helpers/preapply/operations", &[op])
            .await
    }

    /// Inject signed bytes, bounded by the configured injection timeout.
    ///
    /// # Returns
    /// The node's answer as given; a valid injection answers with the
    /// 51-character operation hash.
    pub async fn inject_operation(&self, signed_hex: &str) -> Result<Value, RpcError> {
        let ceiling = self.config().injection_timeout;
        let answer = tokio::time::timeout(ceiling, self.post("injection/operation", signed_hex))
            .await
            .map_err(|_| RpcError::Timeout(ceiling))??;
        info!(answer = %answer, "operation injected");
        Ok(answer)
    }
}
