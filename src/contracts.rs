//! Contract bindings for the swap-and-bridge flow
//!
//! Uses alloy's sol! macro for calldata encoding and return decoding. Calls
//! go through [`EvmRpc::call`](crate::rpc::EvmRpc::call) rather than
//! generated `#[sol(rpc)]` instances so the node connection stays swappable.

#![allow(clippy::too_many_arguments)]

use alloy::primitives::{aliases::U24, Address, Bytes, FixedBytes, U160, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use eyre::{eyre, Result};

sol! {
    /// LayerZero swappable bridge (WETH -> destination token, then OFT send)
    interface ISwappableBridge {
        function swapAndBridge(
            uint amountIn,
            uint amountOutMin,
            uint16 dstChainId,
            address to,
            address refundAddress,
            address zroPaymentAddress,
            bytes adapterParams
        ) external payable;
    }

    /// Uniswap V3 quoter
    interface IQuoter {
        function quoteExactInputSingle(
            address tokenIn,
            address tokenOut,
            uint24 fee,
            uint256 amountIn,
            uint160 sqrtPriceLimitX96
        ) external returns (uint256 amountOut);
    }

    /// LayerZero OFT fee estimation
    interface IOFTFee {
        function estimateSendFee(
            uint16 dstChainId,
            bytes toAddress,
            uint amount,
            bool useZro,
            bytes adapterParams
        ) external view returns (uint nativeFee, uint zroFee);
    }
}

/// Calldata for `estimateSendFee` with `useZro = false` and empty adapter params.
pub fn encode_estimate_send_fee(
    dst_chain_id: u16,
    to_address: FixedBytes<32>,
    amount: U256,
) -> Bytes {
    IOFTFee::estimateSendFeeCall {
        dstChainId: dst_chain_id,
        toAddress: Bytes::copy_from_slice(to_address.as_slice()),
        amount,
        useZro: false,
        adapterParams: Bytes::new(),
    }
    .abi_encode()
    .into()
}

/// Native messaging fee from an `estimateSendFee` return
pub fn decode_native_fee(data: &[u8]) -> Result<U256> {
    let ret = IOFTFee::estimateSendFeeCall::abi_decode_returns(data, true)
        .map_err(|e| eyre!("Failed to decode estimateSendFee return: {}", e))?;
    Ok(ret.nativeFee)
}

/// Calldata for `quoteExactInputSingle` with no price limit.
///
/// Fails if `fee` does not fit the quoter's `uint24` fee tier.
pub fn encode_quote_exact_input_single(
    token_in: Address,
    token_out: Address,
    fee: u32,
    amount_in: U256,
) -> Result<Bytes> {
    let fee = U24::try_from(fee).map_err(|_| eyre!("Pool fee {} exceeds uint24", fee))?;
    Ok(IQuoter::quoteExactInputSingleCall {
        tokenIn: token_in,
        tokenOut: token_out,
        fee,
        amountIn: amount_in,
        sqrtPriceLimitX96: U160::ZERO,
    }
    .abi_encode()
    .into())
}

pub fn decode_amount_out(data: &[u8]) -> Result<U256> {
    let ret = IQuoter::quoteExactInputSingleCall::abi_decode_returns(data, true)
        .map_err(|e| eyre!("Failed to decode quoteExactInputSingle return: {}", e))?;
    Ok(ret.amountOut)
}

/// Calldata for `swapAndBridge`; sender receives and gets refunds, no ZRO payment.
pub fn encode_swap_and_bridge(
    amount_in: U256,
    amount_out_min: U256,
    dst_chain_id: u16,
    sender: Address,
) -> Bytes {
    ISwappableBridge::swapAndBridgeCall {
        amountIn: amount_in,
        amountOutMin: amount_out_min,
        dstChainId: dst_chain_id,
        to: sender,
        refundAddress: sender,
        zroPaymentAddress: Address::ZERO,
        adapterParams: Bytes::new(),
    }
    .abi_encode()
    .into()
}
