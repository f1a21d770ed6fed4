#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sra::{AsymmetricBlockCipher, KeyPair, KeyPairGenerator, ParametersGenerator, SraEngine};

static PAIRS: OnceLock<(KeyPair, KeyPair)> = OnceLock::new();

fn apply(for_encryption: bool, key: &sra::Key, data: &[u8]) -> Vec<u8> {
    let mut engine = SraEngine::new();
    engine.init(for_encryption, key.clone());
    engine.process_block(data, 0, data.len()).unwrap()
}

fuzz_target!(|data: &[u8]| {
    let (alice, bob) = PAIRS.get_or_init(|| {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let params = ParametersGenerator::new().strength(256).certainty(40).generate(&mut rng).unwrap();
        let alice = KeyPairGenerator::new(params.clone()).generate(&mut rng).unwrap();
        let bob = KeyPairGenerator::new(params).generate(&mut rng).unwrap();
        (alice, bob)
    });

    // Stay strictly below a 256-bit modulus.
    let data = if data.len() > 31 { &data[..31] } else { data };

    let alice_bob = apply(true, bob.public(), &apply(true, alice.public(), data));
    let bob_alice = apply(true, alice.public(), &apply(true, bob.public(), data));
    assert_eq!(alice_bob, bob_alice, "layers do not commute for {:?}", data);

    let peeled = apply(false, bob.private(), &apply(false, alice.private(), &alice_bob));
    assert_eq!(
        num_bigint_dig::BigUint::from_bytes_be(&peeled),
        num_bigint_dig::BigUint::from_bytes_be(data)
    );
});
