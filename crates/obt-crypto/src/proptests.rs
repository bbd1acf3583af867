#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::cbc::{self, pad, unpad};
    use crate::content::{ContentPayload, ContentType, FundsRequest, ObtContent, ObtRecord};
    use crate::envelope::{Envelope, MIN_ENVELOPE_LEN};
    use crate::error::ObtError;
    use crate::keys::PrivateKey;
    use crate::obt::{decrypt_bytes, decrypt_content, encrypt_bytes, encrypt_content};
    use crate::shared_secret::derive;

    // Valid secp256k1 scalars: anything in [1, n) works, so keep the top byte
    // below 0xff and force a nonzero low byte.
    fn scalar() -> impl Strategy<Value = PrivateKey> {
        any::<[u8; 32]>().prop_map(|mut b| {
            b[0] &= 0x7f;
            b[31] |= 0x01;
            PrivateKey::from_bytes(&b).unwrap()
        })
    }

    fn opt_text() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("\\PC{0,40}")
    }

    fn funds_request() -> impl Strategy<Value = FundsRequest> {
        (
            "\\PC{0,64}",
            "[0-9]{1,10}(\\.[0-9]{1,8})?",
            "[A-Z]{2,6}",
            "[A-Z]{2,6}",
            opt_text(),
            opt_text(),
            opt_text(),
        )
            .prop_map(|(payee, amount, chain, token, memo, hash, offline_url)| FundsRequest {
                payee_public_address: payee,
                amount,
                chain_code: chain,
                token_code: token,
                memo,
                hash,
                offline_url,
            })
    }

    fn obt_record() -> impl Strategy<Value = ObtRecord> {
        (
            ("\\PC{0,64}", "\\PC{0,64}", "[0-9]{1,10}", "[A-Z]{2,6}", "[A-Z]{2,6}"),
            ("[a-z_]{1,24}", "\\PC{0,80}"),
            (opt_text(), opt_text(), opt_text()),
        )
            .prop_map(
                |((payer, payee, amount, chain, token), (status, obt_id), (memo, hash, offline_url))| {
                    ObtRecord {
                        payer_public_address: payer,
                        payee_public_address: payee,
                        amount,
                        chain_code: chain,
                        token_code: token,
                        status,
                        obt_id,
                        memo,
                        hash,
                        offline_url,
                    }
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_secret_symmetry(a in scalar(), b in scalar()) {
            let ab = derive(&a, &b.public_key()).unwrap();
            let ba = derive(&b, &a.public_key()).unwrap();
            prop_assert_eq!(ab.to_bytes(), ba.to_bytes());
        }

        #[test]
        fn test_bytes_roundtrip(a in scalar(), b in scalar(), msg in any::<Vec<u8>>()) {
            let framed = encrypt_bytes(&a, &b.public_key(), &msg).unwrap();
            prop_assert!(framed.len() >= MIN_ENVELOPE_LEN);
            prop_assert_eq!((framed.len() - MIN_ENVELOPE_LEN) % 16, 0);

            let opened = decrypt_bytes(&b, &a.public_key(), &framed).unwrap();
            prop_assert_eq!(opened, msg);
        }

        #[test]
        fn test_request_roundtrip(a in scalar(), b in scalar(), req in funds_request()) {
            let content = ObtContent::from(req);
            let hex_env = encrypt_content(&content, &a, &b.public_key().to_string()).unwrap();
            let opened = decrypt_content(
                &hex_env,
                &b,
                &a.public_key().to_string(),
                ContentType::NewFundsContent,
            ).unwrap();
            prop_assert_eq!(opened, content);
        }

        #[test]
        fn test_record_roundtrip(a in scalar(), b in scalar(), rec in obt_record()) {
            let content = ObtContent::from(rec);
            let hex_env = encrypt_content(&content, &a, &b.public_key().to_k1_string()).unwrap();
            let opened = decrypt_content(
                &hex_env,
                &b,
                &a.public_key().to_string(),
                ContentType::RecordObtDataContent,
            ).unwrap();
            prop_assert_eq!(opened, content);
        }

        #[test]
        fn test_tamper_detection(
            a in scalar(),
            b in scalar(),
            msg in proptest::collection::vec(any::<u8>(), 0..100),
            pos in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut framed = encrypt_bytes(&a, &b.public_key(), &msg).unwrap();
            let i = pos.index(framed.len());
            framed[i] ^= 1 << bit;

            let result = decrypt_bytes(&b, &a.public_key(), &framed);
            prop_assert!(matches!(result, Err(ObtError::Authentication)));
        }

        #[test]
        fn test_padding_properties(data in proptest::collection::vec(any::<u8>(), 0..300)) {
            let padded = pad(&data);
            prop_assert!(!padded.is_empty());
            prop_assert_eq!(padded.len() % cbc::BLOCK_SIZE, 0);
            prop_assert!(padded.len() > data.len());
            prop_assert!(padded.len() - data.len() <= cbc::BLOCK_SIZE);
            prop_assert_eq!(unpad(padded).unwrap(), data);
        }

        #[test]
        fn test_short_envelope_rejected(bytes in proptest::collection::vec(any::<u8>(), 0..MIN_ENVELOPE_LEN)) {
            prop_assert!(matches!(Envelope::parse(&bytes), Err(ObtError::EnvelopeFormat(_))));
        }

        #[test]
        fn test_abi_roundtrip(req in funds_request()) {
            let bytes = req.to_abi_bytes().unwrap();
            prop_assert_eq!(FundsRequest::from_abi_bytes(&bytes).unwrap(), req);
        }
    }
}
