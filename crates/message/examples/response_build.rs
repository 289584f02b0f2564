use http::Version;
use micro_message::{Headers, RawBody, Response};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Initialize logging
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let headers = Headers::from_iter([("Content-Type", "application/json")]);

    let response = match Response::from_parts(r#"{"status":"ok"}"#, 200, headers) {
        Ok(response) => response,
        Err(e) => {
            error!(cause = %e, "building response failed");
            return;
        }
    };

    info!(
        status = response.status_code(),
        reason = response.reason_phrase(),
        version = ?response.protocol_version(),
        "built response"
    );

    for (name, values) in response.headers().iter() {
        info!(header = name, values = %values.join(","), "header");
    }

    // a raw body, once set, wins over the stream body
    let with_raw = response.with_raw_body("precomputed payload");

    match with_raw.response_body() {
        Ok(Some(RawBody::Text(text))) => info!(payload = %text, "raw payload"),
        Ok(Some(RawBody::Bytes(bytes))) => info!(payload = ?bytes, "stream payload"),
        Ok(other) => info!(payload = ?other, "payload"),
        Err(e) => error!(cause = %e, "reading payload failed"),
    }

    let downgraded = with_raw.with_protocol_version(Version::HTTP_10);
    info!(version = ?downgraded.protocol_version(), "downgraded clone, original untouched");
}
