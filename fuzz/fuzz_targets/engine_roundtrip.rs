#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sra::{AsymmetricBlockCipher, Error, KeyPair, KeyPairGenerator, ParametersGenerator, SraEngine};

static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let key_pair = KEYPAIR.get_or_init(|| {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let params = ParametersGenerator::new().strength(128).certainty(40).generate(&mut rng).unwrap();
        KeyPairGenerator::new(params).generate(&mut rng).unwrap()
    });

    let mut engine = SraEngine::new();
    engine.init(true, key_pair.public().clone());

    // Arbitrary input must either encrypt or be rejected as too large, never panic.
    let ciphertext = match engine.process_block(data, 0, data.len()) {
        Ok(ct) => ct,
        Err(Error::DataLength { .. }) => return,
        Err(err) => panic!("unexpected error for input {:?}: {err}", data),
    };

    engine.init(false, key_pair.private().clone());
    let decrypted = engine
        .process_block(&ciphertext, 0, ciphertext.len())
        .unwrap_or_else(|err| panic!("decryption failed for valid ciphertext: {err}"));

    // Compare as integers; leading zero bytes are not preserved.
    let original = num_bigint_dig::BigUint::from_bytes_be(data);
    let recovered = num_bigint_dig::BigUint::from_bytes_be(&decrypted);

    assert_eq!(
        original, recovered,
        "Plaintext mismatch!\nOriginal bytes: {:?}\nDecrypted bytes: {:?}",
        data, decrypted
    );
});
