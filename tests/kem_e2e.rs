//! End-to-end encapsulate/decapsulate suites over BLS12-381.
//!
//! Key material is hand-built to satisfy the scheme's keygen invariant
//! (sibling wires of every AND/OR carry the same share), since setup
//! derivation is out of scope for this crate.

use ark_bls12_381::{Bls12_381, Fr, G2Affine};
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use std::collections::HashMap;

use circuit_kem::{
    Assignment, Circuit, Encapsulation, Error, Gate, KemEngine, KemMode, KemParameters,
    PublicKey, SecretKey,
};

type E = Bls12_381;
type G1 = <E as Pairing>::G1;
type G2 = <E as Pairing>::G2;

fn g1(scalar: u64) -> <E as Pairing>::G1Affine {
    (G1::generator() * Fr::from(scalar)).into_affine()
}

fn open(t: &<E as Pairing>::G1Affine, d: u64) -> PairingOutput<E> {
    E::pairing(*t, (G2::generator() * Fr::from(d)).into_affine())
}

/// OUT = AND(IN0, IN1) with equal masks and equal D-shares, so the two
/// opened leaf shares agree as the gate rule requires.
fn and_keypair() -> (PublicKey<E>, SecretKey<E>) {
    let circuit = Circuit::new(2, vec![Gate::input(), Gate::input(), Gate::and(0, 1)]).unwrap();
    let public_key = PublicKey::new(vec![g1(2), g1(2)]);
    let secret_key = SecretKey::new(
        circuit,
        vec![vec![Fr::from(3u64)], vec![Fr::from(3u64)]],
        HashMap::new(),
    )
    .unwrap();
    (public_key, secret_key)
}

fn or_keypair() -> (PublicKey<E>, SecretKey<E>) {
    let circuit = Circuit::new(2, vec![Gate::input(), Gate::input(), Gate::or(0, 1)]).unwrap();
    let public_key = PublicKey::new(vec![g1(2), g1(2)]);
    let secret_key = SecretKey::new(
        circuit,
        vec![vec![Fr::from(3u64)], vec![Fr::from(3u64)]],
        HashMap::new(),
    )
    .unwrap();
    (public_key, secret_key)
}

fn engines(
    public_key: PublicKey<E>,
    secret_key: SecretKey<E>,
    assignment: &str,
) -> (KemEngine<E>, KemEngine<E>) {
    let assignment: Assignment = assignment.parse().unwrap();
    let enc = KemEngine::new(
        KemMode::Encapsulate,
        KemParameters::Encryption { public_key, assignment: assignment.clone() },
    )
    .unwrap();
    let dec = KemEngine::new(
        KemMode::Decapsulate,
        KemParameters::Decryption { secret_key, assignment },
    )
    .unwrap();
    (enc, dec)
}

#[test]
fn and_round_trip_recovers_leaf_product() {
    let mut rng = StdRng::seed_from_u64(11);
    let (pk, sk) = and_keypair();
    let (enc, dec) = engines(pk, sk, "11");

    let encap = enc.encapsulate(&mut rng).unwrap();
    let recovered = dec.decapsulate(&encap.to_bytes().unwrap()).unwrap();

    let ts0 = encap.attribute_shares[0].unwrap();
    let ts1 = encap.attribute_shares[1].unwrap();
    let expected = open(&ts0, 3) + open(&ts1, 3);
    assert_eq!(recovered, expected);
}

#[test]
fn and_reference_vector_with_fixed_scalar() {
    // Fixed s makes the recovered element a closed-form product:
    // masks are g1^2, D-shares 3, so K = e(g1,g2)^{2*3*s} * e(g1,g2)^{2*3*s}.
    let s = Fr::from(41u64);
    let (pk, sk) = and_keypair();
    let (_, dec) = engines(pk.clone(), sk, "11");

    let encap = Encapsulation::<E> {
        attribute_shares: vec![
            Some((pk.capital_t_at(0).into_group() * s).into_affine()),
            Some((pk.capital_t_at(1).into_group() * s).into_affine()),
        ],
        session_point: (G1::generator() * s).into_affine(),
    };
    let recovered = dec.decapsulate(&encap.to_bytes().unwrap()).unwrap();

    let exponent = Fr::from(12u64) * s; // 2 * 3 * s, twice
    let expected = E::pairing(
        (G1::generator() * exponent).into_affine(),
        G2Affine::generator(),
    );
    assert_eq!(recovered, expected);
}

#[test]
fn and_rejects_partial_assignment() {
    let mut rng = StdRng::seed_from_u64(12);
    let (pk, sk) = and_keypair();
    let (enc, dec) = engines(pk, sk, "10");

    let encap = enc.encapsulate(&mut rng).unwrap();
    let err = dec.decapsulate(&encap.to_bytes().unwrap());
    assert!(matches!(err, Err(Error::PolicyNotSatisfied)));
}

#[test]
fn or_recovers_present_branch_unchanged() {
    let mut rng = StdRng::seed_from_u64(13);
    let (pk, sk) = or_keypair();
    let (enc, dec) = engines(pk, sk, "10");

    let encap = enc.encapsulate(&mut rng).unwrap();
    let recovered = dec.decapsulate(&encap.to_bytes().unwrap()).unwrap();

    // Exactly IN0's opened share, the absent IN1 branch is ignored.
    let ts0 = encap.attribute_shares[0].unwrap();
    assert_eq!(recovered, open(&ts0, 3));
}

#[test]
fn or_rejects_nothing_satisfied() {
    let mut rng = StdRng::seed_from_u64(14);
    let (pk, sk) = or_keypair();
    let (enc, dec) = engines(pk, sk, "00");

    let encap = enc.encapsulate(&mut rng).unwrap();
    let err = dec.decapsulate(&encap.to_bytes().unwrap());
    assert!(matches!(err, Err(Error::PolicyNotSatisfied)));
}

#[test]
fn inconsistent_key_material_is_rejected_not_decapsulated() {
    // Unequal D-shares under an AND: both leaves open, but the sibling
    // shares disagree. Must fail closed, never pick a side.
    let mut rng = StdRng::seed_from_u64(15);
    let circuit = Circuit::new(2, vec![Gate::input(), Gate::input(), Gate::and(0, 1)]).unwrap();
    let pk = PublicKey::new(vec![g1(2), g1(2)]);
    let sk = SecretKey::new(
        circuit,
        vec![vec![Fr::from(3u64)], vec![Fr::from(4u64)]],
        HashMap::new(),
    )
    .unwrap();
    let (enc, dec) = engines(pk, sk, "11");

    let encap = enc.encapsulate(&mut rng).unwrap();
    let err = dec.decapsulate(&encap.to_bytes().unwrap());
    assert!(matches!(err, Err(Error::ShareConsistency)));
}

#[test]
fn fan_out_circuit_round_trip() {
    // IN0 feeds a fan-out splitting its two opened shares to two AND
    // successors. P-shares are chosen so each re-randomized branch equals
    // the sibling leaf share: d=2 plus p=3 meets d=5, d=4 plus p=1 meets
    // d=5. The output exponent telescopes to 20s.
    let mut rng = StdRng::seed_from_u64(16);
    let circuit = Circuit::new(
        3,
        vec![
            Gate::input(),
            Gate::input(),
            Gate::input(),
            Gate::fan_out(0),
            Gate::and(3, 1),
            Gate::and(3, 2),
            Gate::and(4, 5),
        ],
    )
    .unwrap();
    let mut p = HashMap::new();
    p.insert(circuit.wire(3, 4).unwrap(), vec![Fr::from(3u64)]);
    p.insert(circuit.wire(3, 5).unwrap(), vec![Fr::from(1u64)]);
    let pk = PublicKey::new(vec![g1(1), g1(1), g1(1)]);
    let sk = SecretKey::new(
        circuit,
        vec![
            vec![Fr::from(2u64), Fr::from(4u64)],
            vec![Fr::from(5u64)],
            vec![Fr::from(5u64)],
        ],
        p,
    )
    .unwrap();
    let (enc, dec) = engines(pk, sk, "111");

    let encap = enc.encapsulate(&mut rng).unwrap();
    let recovered = dec.decapsulate(&encap.to_bytes().unwrap()).unwrap();

    let expected = E::pairing(
        (encap.session_point.into_group() * Fr::from(20u64)).into_affine(),
        G2Affine::generator(),
    );
    assert_eq!(recovered, expected);
}

#[test]
fn decapsulation_is_deterministic_per_ciphertext() {
    let mut rng = StdRng::seed_from_u64(17);
    let (pk, sk) = and_keypair();
    let (enc, dec) = engines(pk, sk, "11");

    let bytes = enc.encapsulate(&mut rng).unwrap().to_bytes().unwrap();
    let first = dec.decapsulate(&bytes).unwrap();
    let second = dec.decapsulate(&bytes).unwrap();
    assert_eq!(first, second);
}

#[test]
fn fresh_randomness_changes_the_secret() {
    let mut rng = StdRng::seed_from_u64(18);
    let (pk, sk) = and_keypair();
    let (enc, dec) = engines(pk, sk, "11");

    let k1 = dec
        .decapsulate(&enc.encapsulate(&mut rng).unwrap().to_bytes().unwrap())
        .unwrap();
    let k2 = dec
        .decapsulate(&enc.encapsulate(&mut rng).unwrap().to_bytes().unwrap())
        .unwrap();
    assert_ne!(k1, k2);
}

#[test]
fn truncated_ciphertext_is_a_serialization_error() {
    let mut rng = StdRng::seed_from_u64(19);
    let (pk, sk) = and_keypair();
    let (enc, dec) = engines(pk, sk, "11");

    let bytes = enc.encapsulate(&mut rng).unwrap().to_bytes().unwrap();
    let err = dec.decapsulate(&bytes[..bytes.len() - 1]);
    assert!(matches!(err, Err(Error::Serialization(_))));
}

#[test]
fn tampered_ciphertext_does_not_decapsulate_to_the_same_secret() {
    let mut rng = StdRng::seed_from_u64(20);
    let (pk, sk) = and_keypair();
    let (enc, dec) = engines(pk, sk, "11");

    let bytes = enc.encapsulate(&mut rng).unwrap().to_bytes().unwrap();
    let honest = dec.decapsulate(&bytes).unwrap();

    let mut tampered = bytes.clone();
    tampered[0] ^= 0x01;
    match dec.decapsulate(&tampered) {
        // A flip landing on another valid encoding desynchronizes the two
        // leaf openings; whichever error surfaces, the honest secret must
        // never come back.
        Ok(k) => assert_ne!(k, honest),
        Err(_) => {}
    }
}
