//! Hub MQTT topic names.

pub const API_VERSION: &str = "2021-04-12";
pub const METHODS_SUBSCRIPTION: &str = "$iothub/methods/POST/#";
pub const TWIN_RESPONSE_SUBSCRIPTION: &str = "$iothub/twin/res/#";

const METHODS_PREFIX: &str = "$iothub/methods/POST/";
const TWIN_RESPONSE_PREFIX: &str = "$iothub/twin/res/";

pub fn username(host_name: &str, device_id: &str, model_id: &str) -> String {
    format!("{host_name}/{device_id}/?api-version={API_VERSION}&model-id={model_id}")
}

pub fn telemetry_topic(device_id: &str) -> String {
    format!("devices/{device_id}/messages/events/$.ct=application%2Fjson&$.ce=utf-8")
}

pub fn method_response_topic(status: u16, request_id: &str) -> String {
    format!("$iothub/methods/res/{status}/?$rid={request_id}")
}

pub fn reported_properties_topic(request_id: u64) -> String {
    format!("$iothub/twin/PATCH/properties/reported/?$rid={request_id}")
}

pub fn parse_method_request(topic: &str) -> Option<(String, String)> {
    let rest = topic.strip_prefix(METHODS_PREFIX)?;
    let (name, query) = rest.split_once("/?")?;
    if name.is_empty() {
        return None;
    }
    let rid = query_param(query, "$rid")?;
    Some((name.to_string(), rid.to_string()))
}

pub fn parse_twin_response(topic: &str) -> Option<(u16, String)> {
    let rest = topic.strip_prefix(TWIN_RESPONSE_PREFIX)?;
    let (status, query) = rest.split_once("/?")?;
    let status = status.parse().ok()?;
    let rid = query_param(query, "$rid")?;
    Some((status, rid.to_string()))
}

fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}
