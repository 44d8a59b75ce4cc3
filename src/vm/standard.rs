//! Canonical verification-script templates.
//!
//! A "standard" contract is one whose script is exactly the single-signature
//! or m-of-n multi-signature template. Witness checks special-case these, and
//! `System.Contract.IsStandard` reports whether a stored script matches.

use crate::crypto::COMPRESSED_KEY_LEN;
use crate::vm::opcode::OpCode;

const SIG_SCRIPT_LEN: usize = 1 + COMPRESSED_KEY_LEN + 1;

/// Builds the single-signature verification script for a compressed key:
/// `PUSHBYTES33 <key> CHECKSIG`.
pub fn create_signature_redeem_script(key: &[u8; COMPRESSED_KEY_LEN]) -> Vec<u8> {
    let mut script = Vec::with_capacity(SIG_SCRIPT_LEN);
    script.push(COMPRESSED_KEY_LEN as u8);
    script.extend_from_slice(key);
    script.push(OpCode::CheckSig as u8);
    script
}

/// Builds the m-of-n multi-signature verification script:
/// `PUSH_m (PUSHBYTES33 <key>)* PUSH_n CHECKMULTISIG`.
///
/// Returns `None` unless `1 <= m <= n <= 16`.
pub fn create_multisig_redeem_script(
    m: usize,
    keys: &[[u8; COMPRESSED_KEY_LEN]],
) -> Option<Vec<u8>> {
    let n = keys.len();
    if m < 1 || m > n || n > 16 {
        return None;
    }
    let mut script = Vec::with_capacity(2 + n * (1 + COMPRESSED_KEY_LEN) + 2);
    script.push(0x50 + m as u8);
    for key in keys {
        script.push(COMPRESSED_KEY_LEN as u8);
        script.extend_from_slice(key);
    }
    script.push(0x50 + n as u8);
    script.push(OpCode::CheckMultisig as u8);
    Some(script)
}

pub fn is_signature_contract(script: &[u8]) -> bool {
    script.len() == SIG_SCRIPT_LEN
        && script[0] == COMPRESSED_KEY_LEN as u8
        && script[SIG_SCRIPT_LEN - 1] == OpCode::CheckSig as u8
}

pub fn is_multisig_contract(script: &[u8]) -> bool {
    let Some((&first, rest)) = script.split_first() else {
        return false;
    };
    if !(0x51..=0x60).contains(&first) {
        return false;
    }
    let m = (first - 0x50) as usize;

    let mut rest = rest;
    let mut n = 0usize;
    while rest.first() == Some(&(COMPRESSED_KEY_LEN as u8)) {
        if rest.len() < 1 + COMPRESSED_KEY_LEN {
            return false;
        }
        rest = &rest[1 + COMPRESSED_KEY_LEN..];
        n += 1;
    }
    if n < m || n > 16 {
        return false;
    }
    rest == [0x50 + n as u8, OpCode::CheckMultisig as u8]
}

pub fn is_standard_contract(script: &[u8]) -> bool {
    is_signature_contract(script) || is_multisig_contract(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(fill: u8) -> [u8; COMPRESSED_KEY_LEN] {
        let mut k = [fill; COMPRESSED_KEY_LEN];
        k[0] = 0x02;
        k
    }

    #[test]
    fn signature_template() {
        let script = create_signature_redeem_script(&key(7));
        assert_eq!(script.len(), 35);
        assert!(is_signature_contract(&script));
        assert!(is_standard_contract(&script));
        assert!(!is_multisig_contract(&script));
    }

    #[test]
    fn multisig_template() {
        let keys = [key(1), key(2), key(3)];
        let script = create_multisig_redeem_script(2, &keys).unwrap();
        assert!(is_multisig_contract(&script));
        assert!(is_standard_contract(&script));
        assert!(!is_signature_contract(&script));
    }

    #[test]
    fn multisig_bounds() {
        assert!(create_multisig_redeem_script(0, &[key(1)]).is_none());
        assert!(create_multisig_redeem_script(2, &[key(1)]).is_none());
    }

    #[test]
    fn arbitrary_script_is_not_standard() {
        assert!(!is_standard_contract(&[0x51]));
        assert!(!is_standard_contract(&[]));
        // Truncated key list.
        let mut script = create_signature_redeem_script(&key(9));
        script.pop();
        assert!(!is_standard_contract(&script));
    }
}
