use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;

use ecs_deploy_test::config::CliConfig;
use ecs_deploy_test::context::StackConfig;
use ecs_deploy_test::decl::build;
use ecs_deploy_test::provision::{Provisioner, Remote, provision};

/// Answers one request with `status` and `body`, returning what it received.
fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut head = String::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
            head.push_str(&line);
            if line == "\r\n" {
                break;
            }
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();

        head + &String::from_utf8(request_body).unwrap()
    });

    (address, handle)
}

#[tokio::test]
async fn remote_apply_posts_declaration_and_reads_outputs() {
    let (address, server) = serve_once(
        "201 Created",
        r#"{
            "id": "0192f3a4-5b6c-7d8e-9f00-112233445566",
            "created_at": "2026-10-16T09:30:00Z",
            "outputs": [
                {"name": "ImageTag", "value": "1.25-alpine"},
                {"name": "ServiceName", "value": "DeployTestService"},
                {"name": "ClusterName", "value": "DeployTestCluster"}
            ]
        }"#,
    );
    let config = CliConfig::new(&address, Some("secret-token".to_string()));
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let declaration = build(&StackConfig {
        image_tag: "1.25-alpine".to_string(),
    });

    let provisioned = provision(&Remote::new(&client, &config), &declaration)
        .await
        .unwrap();

    assert_eq!(
        provisioned.deployment_id.to_string(),
        "0192f3a4-5b6c-7d8e-9f00-112233445566"
    );
    assert!(provisioned.created_at.is_some());
    let names: Vec<&str> = provisioned.outputs.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["ServiceName", "ClusterName", "ImageTag"]);
    assert_eq!(provisioned.outputs[2].description, "Nginx Docker image tag used");

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /stacks HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer secret-token"));
    assert!(request.contains("\"stack_name\":\"EcsDeployTestStack\""));
    assert!(request.contains("public.ecr.aws/nginx/nginx"));
}

#[tokio::test]
async fn unreported_outputs_keep_their_place() {
    let (address, server) = serve_once(
        "201 Created",
        r#"{
            "id": "0192f3a4-5b6c-7d8e-9f00-112233445566",
            "created_at": "2026-10-16T09:30:00Z",
            "outputs": [{"name": "ImageTag", "value": "1.27"}]
        }"#,
    );
    let config = CliConfig::new(&address, None);
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let declaration = build(&StackConfig::default());

    let provisioned = Remote::new(&client, &config)
        .apply(&declaration)
        .await
        .unwrap();
    server.join().unwrap();

    let outputs: Vec<(&str, &str)> = provisioned
        .outputs
        .iter()
        .map(|o| (o.name.as_str(), o.value.as_str()))
        .collect();
    assert_eq!(
        outputs,
        vec![
            ("ServiceName", "<not reported>"),
            ("ClusterName", "<not reported>"),
            ("ImageTag", "1.27"),
        ]
    );
}

#[tokio::test]
async fn remote_apply_surfaces_rejection_reason() {
    let (address, server) = serve_once(
        "409 Conflict",
        r#"{"reason": "cluster DeployTestCluster already exists"}"#,
    );
    let config = CliConfig::new(&address, None);
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let declaration = build(&StackConfig::default());

    let err = Remote::new(&client, &config)
        .apply(&declaration)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("cluster DeployTestCluster already exists"));
    let request = server.join().unwrap();
    assert!(!request.to_ascii_lowercase().contains("authorization:"));
}
