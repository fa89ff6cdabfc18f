//! Throwaway RSA keys for adapter tests.

use std::sync::OnceLock;

use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::EncodePrivateKey;
use rsa::RsaPrivateKey;

use super::ServiceAccountKey;

pub(super) const CLIENT_EMAIL: &str = "enrolment@project.iam.gserviceaccount.com";
pub(super) const KEY_ID: &str = "test-key-1";

pub(super) struct TestKeyPair {
    pub(super) private_pem: String,
    pub(super) public_pem: String,
}

/// One key pair per test binary; generation is slow in debug builds.
pub(super) fn key_pair() -> &'static TestKeyPair {
    static PAIR: OnceLock<TestKeyPair> = OnceLock::new();
    PAIR.get_or_init(|| {
        let private_key =
            RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("generate RSA key");
        let private_pem = private_key
            .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
            .expect("encode private key")
            .as_str()
            .to_owned();
        let public_pem = private_key
            .to_public_key()
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .expect("encode public key");
        TestKeyPair {
            private_pem,
            public_pem,
        }
    })
}

pub(super) fn service_account_key(token_uri: Option<String>) -> ServiceAccountKey {
    ServiceAccountKey {
        client_email: CLIENT_EMAIL.to_owned(),
        private_key: key_pair().private_pem.clone(),
        private_key_id: Some(KEY_ID.to_owned()),
        token_uri,
    }
}
