//! Typed-data hashing and signer recovery for claim-token permits
//!
//! Verification is a pure function of the digest and the `(v, r, s)` triple so
//! it can be exercised without any pool state. The pool owns nonce and
//! allowance bookkeeping.

use alloy_primitives::{keccak256, Address, B256, U256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

use crate::{Result, SingularityError};

pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub const PERMIT_TYPE: &str =
    "Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

/// Fixed domain version of every claim token
pub const DOMAIN_VERSION: &str = "1";

pub fn permit_typehash() -> B256 {
    keccak256(PERMIT_TYPE)
}

#[inline]
fn word(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

/// ABI-encode a list of 32-byte words
fn encode(words: &[B256]) -> Vec<u8> {
    words.iter().flat_map(|w| w.0).collect()
}

/// `DOMAIN_SEPARATOR` for a claim token
pub fn domain_separator(name: &str, chain_id: u64, verifying_contract: Address) -> B256 {
    keccak256(encode(&[
        keccak256(EIP712_DOMAIN_TYPE),
        keccak256(name),
        keccak256(DOMAIN_VERSION),
        word(U256::from(chain_id)),
        verifying_contract.into_word(),
    ]))
}

/// Struct hash of a `Permit` message
pub fn permit_struct_hash(
    owner: Address,
    spender: Address,
    value: U256,
    nonce: U256,
    deadline: U256,
) -> B256 {
    keccak256(encode(&[
        permit_typehash(),
        owner.into_word(),
        spender.into_word(),
        word(value),
        word(nonce),
        word(deadline),
    ]))
}

/// Final digest signed by the owner: `keccak256(0x1901 ‖ domain ‖ structHash)`
pub fn permit_digest(
    domain_separator: B256,
    owner: Address,
    spender: Address,
    value: U256,
    nonce: U256,
    deadline: U256,
) -> B256 {
    let struct_hash = permit_struct_hash(owner, spender, value, nonce, deadline);
    let mut preimage = Vec::with_capacity(66);
    preimage.extend_from_slice(&[0x19, 0x01]);
    preimage.extend_from_slice(domain_separator.as_slice());
    preimage.extend_from_slice(struct_hash.as_slice());
    keccak256(preimage)
}

/// Address of a secp256k1 public key (last 20 bytes of keccak256 of the point)
pub fn public_key_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recover the signer of `digest`
///
/// Accepts `v` as 27/28 or 0/1. High-s signatures are rejected.
pub fn recover_signer(digest: B256, v: u8, r: B256, s: B256) -> Result<Address> {
    let y_odd = match v {
        27 | 28 => v == 28,
        0 | 1 => v == 1,
        _ => return Err(SingularityError::InvalidSignature),
    };

    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(r.as_slice());
    bytes[32..].copy_from_slice(s.as_slice());
    let signature =
        Signature::from_slice(&bytes).map_err(|_| SingularityError::InvalidSignature)?;
    // Only the low-s form of a signature is valid
    if signature.normalize_s().is_some() {
        return Err(SingularityError::InvalidSignature);
    }
    let recovery_id = RecoveryId::new(y_odd, false);

    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
        .map_err(|_| SingularityError::InvalidSignature)?;
    Ok(public_key_address(&key))
}

/// Sign `digest`, returning `(v, r, s)` with `v` in {27, 28}
pub fn sign_digest(key: &SigningKey, digest: B256) -> Result<(u8, B256, B256)> {
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(digest.as_slice())
        .map_err(|_| SingularityError::InvalidSignature)?;
    let bytes = signature.to_bytes();
    let r = B256::from_slice(&bytes[..32]);
    let s = B256::from_slice(&bytes[32..]);
    Ok((27 + recovery_id.to_byte(), r, s))
}

/// Parse a hex private key ("0x..." or bare hex)
pub fn signing_key_from_hex(hex: &str) -> Option<SigningKey> {
    let bytes: B256 = hex.trim().parse().ok()?;
    SigningKey::from_slice(bytes.as_slice()).ok()
}

pub fn signer_address(key: &SigningKey) -> Address {
    public_key_address(key.verifying_key())
}
