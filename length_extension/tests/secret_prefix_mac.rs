use length_extension::forge;
use sm3hash::{sm3_hash, state_after, Sm3Digest};

/// A server that authenticates requests as `sm3(secret ‖ request)`.
struct NaiveMacServer {
    secret: Vec<u8>,
}

impl NaiveMacServer {
    fn sign(&self, request: &[u8]) -> Sm3Digest {
        let mut keyed = self.secret.clone();
        keyed.extend_from_slice(request);
        sm3_hash(&keyed).unwrap()
    }

    fn accepts(&self, request: &[u8], tag: &Sm3Digest) -> bool {
        &self.sign(request) == tag
    }
}

#[test]
fn forged_request_is_accepted_without_the_secret() {
    let server = NaiveMacServer {
        secret: b"correct horse battery".to_vec(),
    };
    let request = b"userid=1234".to_vec();
    let tag = server.sign(&request);

    // the attacker knows the request, its tag and the secret's length only
    let keyed_len = (server.secret.len() + request.len()) as u64;
    let forged = forge(&tag, keyed_len, b"&admin=true").unwrap();

    let mut forged_request = request.clone();
    forged_request.extend_from_slice(&forged.glue_padding);
    forged_request.extend_from_slice(&forged.suffix);

    assert!(server.accepts(&forged_request, &forged.digest));
    assert!(!server.accepts(&forged_request, &tag));
}

#[test]
fn forged_digest_resumes_from_published_state() {
    let original = b"a message that spans more than one block of sixty four bytes, easily";
    let (state, padded_len) = state_after(original).unwrap();
    let forged = forge(&state.to_digest(), original.len() as u64, b"!").unwrap();
    assert_eq!(padded_len as usize, original.len() + forged.glue_padding.len());
    assert_eq!(
        forged.digest,
        sm3_hash(&forged.forged_message(original)).unwrap()
    );
}
