//! Newline-delimited JSON console on stdin/stdout

use reveille_api::{API_VERSION, ErrorCode, ErrorInfo, Event, Request, Response};
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Parse one request line. On failure, the error response to send back
/// (correlated to the request id when one can be recovered).
pub fn parse_request(line: &str) -> Result<Request, Response> {
    match serde_json::from_str::<Request>(line) {
        Ok(request) if request.api_version != API_VERSION => Err(Response::error(
            request.request_id,
            ErrorInfo::new(
                ErrorCode::InvalidRequest,
                format!(
                    "Unsupported API version {} (expected {})",
                    request.api_version, API_VERSION
                ),
            ),
        )),
        Ok(request) => Ok(request),
        Err(e) => {
            let request_id = serde_json::from_str::<Value>(line)
                .ok()
                .and_then(|v| v.get("request_id").and_then(Value::as_u64))
                .unwrap_or(0);
            Err(Response::error(
                request_id,
                ErrorInfo::new(ErrorCode::InvalidRequest, format!("Malformed request: {}", e)),
            ))
        }
    }
}

/// Writes responses and events, one JSON document per line
pub struct ConsoleWriter<W> {
    out: W,
}

impl<W: AsyncWrite + Unpin> ConsoleWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub async fn response(&mut self, response: &Response) -> anyhow::Result<()> {
        self.write_line(serde_json::to_string(response)?).await
    }

    pub async fn event(&mut self, event: &Event) -> anyhow::Result<()> {
        self.write_line(serde_json::to_string(event)?).await
    }

    async fn write_line(&mut self, mut line: String) -> anyhow::Result<()> {
        line.push('\n');
        self.out.write_all(line.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveille_api::{Command, EventPayload, ResponsePayload, ResponseResult};

    #[test]
    fn parses_valid_request() {
        let request = parse_request(r#"{"request_id":4,"command":{"type":"ping"}}"#).unwrap();
        assert_eq!(request.request_id, 4);
        assert!(matches!(request.command, Command::Ping));
    }

    #[test]
    fn malformed_request_keeps_id_when_possible() {
        let response = parse_request(r#"{"request_id":12,"command":{"type":"explode"}}"#)
            .unwrap_err();
        assert_eq!(response.request_id, 12);
        match response.result {
            ResponseResult::Err(info) => assert_eq!(info.code, ErrorCode::InvalidRequest),
            other => panic!("Expected error, got {:?}", other),
        }

        let response = parse_request("not json at all").unwrap_err();
        assert_eq!(response.request_id, 0);
    }

    #[test]
    fn rejects_other_api_versions() {
        let response =
            parse_request(r#"{"request_id":1,"api_version":9,"command":{"type":"ping"}}"#)
                .unwrap_err();
        assert!(!response.is_ok());
    }

    #[tokio::test]
    async fn writes_one_line_per_message() {
        let mut writer = ConsoleWriter::new(Vec::new());
        writer
            .response(&Response::success(1, ResponsePayload::Pong))
            .await
            .unwrap();
        writer.event(&Event::new(EventPayload::Shutdown)).await.unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"pong\""));
        assert!(lines[1].contains("\"shutdown\""));
    }
}
