use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

fn call(
    stdin: &mut impl Write,
    stdout: &mut impl BufRead,
    id: i64,
    name: &str,
    arguments: serde_json::Value,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    });
    writeln!(stdin, "{}", serde_json::to_string(&request)?)?;
    stdin.flush()?;

    let mut line = String::new();
    stdout.read_line(&mut line)?;
    let response: serde_json::Value = serde_json::from_str(line.trim())?;
    Ok(response.get("result").cloned().expect("result present"))
}

#[test]
fn errors_are_structured_and_server_keeps_running() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut child = Command::new(env!("CARGO_BIN_EXE_mediagen"))
        .arg("serve")
        .current_dir(dir.path())
        .env_remove("KIE_API_KEY")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let mut stdin = child.stdin.take().expect("stdin available");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout available"));

    // Missing required argument.
    let result = call(&mut stdin, &mut stdout, 1, "generate_video", serde_json::json!({}))?;
    assert_eq!(result["isError"], serde_json::json!(true));
    assert_eq!(
        result["structuredContent"]["error"]["kind"],
        serde_json::json!("invalid_input")
    );

    // No API key configured.
    let result = call(
        &mut stdin,
        &mut stdout,
        2,
        "generate_image",
        serde_json::json!({"prompt": "a red cube on a white background"}),
    )?;
    assert_eq!(
        result["structuredContent"]["error"]["kind"],
        serde_json::json!("config")
    );
    assert_eq!(
        result["structuredContent"]["error"]["tool"],
        serde_json::json!("generate_image")
    );

    // Unknown tool.
    let result = call(&mut stdin, &mut stdout, 3, "make_coffee", serde_json::json!({}))?;
    assert_eq!(result["isError"], serde_json::json!(true));

    let _ = child.kill();
    Ok(())
}
