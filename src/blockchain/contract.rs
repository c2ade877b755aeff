//! ABI-driven contract calls.
//!
//! A [`ContractDispatcher`] is built once per ABI and maps every function
//! signature to its typed descriptor, so calls are resolved against the ABI
//! instead of looked up by name on a dynamic object.

use std::collections::BTreeMap;

use alloy::dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{build_request, submit};
use crate::blockchain::types::{BlockchainError, BlockchainResult, GasSettings};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Function table for one contract ABI.
#[derive(Debug, Clone, Default)]
pub struct ContractDispatcher {
    /// Keyed by full signature, e.g. `transfer(address,uint256)`.
    functions: BTreeMap<String, Function>,
}

impl ContractDispatcher {
    /// Index every function of `abi`.
    pub fn new(abi: &JsonAbi) -> Self {
        let functions = abi
            .functions()
            .map(|f| (f.signature(), f.clone()))
            .collect();
        Self { functions }
    }

    /// Resolve a function by full signature, or by name and argument count.
    ///
    /// Bare names pick the overload whose arity matches.
    pub fn function(&self, name: &str, arity: usize) -> BlockchainResult<&Function> {
        if let Some(function) = self.functions.get(name) {
            return Ok(function);
        }
        self.functions
            .values()
            .find(|f| f.name == name && f.inputs.len() == arity)
            .ok_or_else(|| BlockchainError::UnknownFunction(format!("{name}/{arity}")))
    }

    /// Encode calldata for `name` with typed arguments.
    pub fn encode_call(
        &self,
        name: &str,
        args: &[DynSolValue],
    ) -> BlockchainResult<(&Function, Bytes)> {
        let function = self.function(name, args.len())?;
        let data = function.abi_encode_input(args)?;
        Ok((function, data.into()))
    }

    /// Coerce string arguments into the parameter types of `name`.
    pub fn coerce_args<S: AsRef<str>>(
        &self,
        name: &str,
        args: &[S],
    ) -> BlockchainResult<Vec<DynSolValue>> {
        let function = self.function(name, args.len())?;
        function
            .inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| -> BlockchainResult<DynSolValue> {
                let ty = DynSolType::parse(&param.selector_type())?;
                Ok(ty.coerce_str(arg.as_ref())?)
            })
            .collect()
    }

    /// Number of distinct signatures in the table.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the ABI declared no functions.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Call a read-only contract function and decode its outputs.
pub async fn read_contract(
    contract: Address,
    abi: &JsonAbi,
    function: &str,
    args: &[DynSolValue],
    rpc_url: &str,
) -> BlockchainResult<Vec<DynSolValue>> {
    let dispatcher = ContractDispatcher::new(abi);
    let (func, data) = dispatcher.encode_call(function, args)?;
    let client = BlockchainClient::connect(rpc_url)?;

    let tx = TransactionRequest::default().with_to(contract).with_input(data);
    metrics::record_rpc_call("eth_call");
    let output = client.provider().call(tx).await?;

    Ok(func.abi_decode_output(&output)?)
}

/// Send a state-changing contract call signed by `private_key`.
pub async fn interact_with_contract(
    contract: Address,
    abi: &JsonAbi,
    function: &str,
    args: &[DynSolValue],
    private_key: &str,
    gas: GasSettings,
    rpc_url: &str,
) -> BlockchainResult<TxHash> {
    let dispatcher = ContractDispatcher::new(abi);
    let (func, data) = dispatcher.encode_call(function, args)?;
    let wallet = Wallet::from_private_key(private_key)?;
    let client = BlockchainClient::connect_with_wallet(rpc_url, &wallet)?;

    tracing::debug!(
        contract = %contract,
        function = %func.signature(),
        "Submitting contract call"
    );

    submit(&client, build_request(contract, U256::ZERO, data, gas)).await
}
