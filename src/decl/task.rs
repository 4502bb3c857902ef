use std::fmt;

use serde::{Deserialize, Serialize};

use super::ResourceRef;
use super::ports::{HTTP_PORT, Port};
use crate::context::StackConfig;

pub const LOGICAL_ID: &str = "TaskDef";
pub const CONTAINER_NAME: &str = "nginx";
pub const REGISTRY_PATH: &str = "public.ecr.aws/nginx/nginx";
pub const LOG_STREAM_PREFIX: &str = "nginx";
pub const CPU_UNITS: u32 = 256;
pub const MEMORY_MIB: u32 = 512;

const IMAGE_TAG_TOKEN: &str = "{{IMAGE_TAG}}";

/// Shell payload run by the container at start. It writes a status page,
/// fills in the server version and start time, then runs nginx in the
/// foreground. Only the image tag line is filled in before deployment.
// Indented blank lines are separate pieces so their spaces survive editors.
const STARTUP_SCRIPT: &str = concat!(
    r#"
      echo "Starting Nginx container..."
      echo "Nginx version: $(nginx -v 2>&1)"
      echo "Container started at: $(date)"
"#,
    "      \n",
    r#"      # Create custom index.html with version info
      cat > /usr/share/nginx/html/index.html << 'EOF'
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Nginx Deploy Test</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; background-color: #f4f4f4; }
        .container { background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        .version { color: #007acc; font-weight: bold; }
        .timestamp { color: #666; font-size: 0.9em; }
        .tag { color: #28a745; font-weight: bold; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Nginx Deploy Test</h1>
        <p>Container successfully deployed!</p>
        <p class="tag">Image Tag: {{IMAGE_TAG}}</p>
        <p class="version">Nginx Version: NGINX_VERSION_PLACEHOLDER</p>
        <p class="timestamp">Deployed at: TIMESTAMP_PLACEHOLDER</p>
        <hr>
        <p>This container is running on ECS Fargate with direct access.</p>
    </div>
</body>
</html>
EOF

      # Replace placeholders with actual values
      NGINX_VER=$(nginx -v 2>&1 | sed 's/.*nginx\/\([^[:space:]]*\).*/\1/')
      TIMESTAMP=$(date)
      sed -i "s/NGINX_VERSION_PLACEHOLDER/$NGINX_VER/g" /usr/share/nginx/html/index.html
      sed -i "s/TIMESTAMP_PLACEHOLDER/$TIMESTAMP/g" /usr/share/nginx/html/index.html
"#,
    "      \n",
    r#"      echo "Custom HTML page created successfully"
"#,
    "      \n",
    r#"      # Start nginx
      nginx -g 'daemon off;'
    "#,
);

pub fn startup_script(image_tag: &str) -> String {
    STARTUP_SCRIPT.replacen(IMAGE_TAG_TOKEN, image_tag, 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchType {
    Fargate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    pub registry_path: String,
    pub tag: String,
}

impl ImageReference {
    pub fn new(registry_path: &str, tag: &str) -> Self {
        ImageReference {
            registry_path: registry_path.to_string(),
            tag: tag.to_string(),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.registry_path, self.tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogDriver {
    Awslogs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfiguration {
    pub driver: LogDriver,
    pub stream_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDefinition {
    pub name: String,
    pub image: ImageReference,
    pub memory_limit_mib: u32,
    pub logging: LogConfiguration,
    pub command: Vec<String>,
    pub port_mappings: Vec<Port>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: String,
    pub launch_type: LaunchType,
    pub cpu: u32,
    pub memory_mib: u32,
    pub container: ContainerDefinition,
}

pub fn declare(config: &StackConfig) -> TaskDefinition {
    let container = ContainerDefinition {
        name: CONTAINER_NAME.to_string(),
        image: ImageReference::new(REGISTRY_PATH, &config.image_tag),
        memory_limit_mib: MEMORY_MIB,
        logging: LogConfiguration {
            driver: LogDriver::Awslogs,
            stream_prefix: LOG_STREAM_PREFIX.to_string(),
        },
        command: vec![
            "/bin/bash".to_string(),
            "-c".to_string(),
            startup_script(&config.image_tag),
        ],
        port_mappings: vec![HTTP_PORT],
    };

    TaskDefinition {
        id: LOGICAL_ID.to_string(),
        launch_type: LaunchType::Fargate,
        cpu: CPU_UNITS,
        memory_mib: MEMORY_MIB,
        container,
    }
}

impl TaskDefinition {
    pub fn reference(&self) -> ResourceRef {
        ResourceRef::new(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(tag: &str) -> StackConfig {
        StackConfig {
            image_tag: tag.to_string(),
        }
    }

    #[test]
    fn image_reference_is_verbatim() {
        let task = declare(&config(" 1.25 alpine/../x "));
        assert_eq!(
            task.container.image.to_string(),
            "public.ecr.aws/nginx/nginx: 1.25 alpine/../x "
        );
    }

    #[test]
    fn fixed_limits_and_logging() {
        let task = declare(&config("1.27"));
        assert_eq!(task.cpu, 256);
        assert_eq!(task.memory_mib, 512);
        assert_eq!(task.container.memory_limit_mib, 512);
        assert_eq!(task.container.logging.driver, LogDriver::Awslogs);
        assert_eq!(task.container.logging.stream_prefix, "nginx");
        assert_eq!(task.container.port_mappings, vec![Port::Tcp(80)]);
    }

    #[test]
    fn command_runs_script_through_bash() {
        let task = declare(&config("1.27"));
        let command = &task.container.command;
        assert_eq!(command.len(), 3);
        assert_eq!(command[0], "/bin/bash");
        assert_eq!(command[1], "-c");
        assert!(command[2].contains("<p class=\"tag\">Image Tag: 1.27</p>"));
        assert!(command[2].trim_end().ends_with("nginx -g 'daemon off;'"));
    }

    #[test]
    fn runtime_placeholders_are_left_alone() {
        let script = startup_script("1.25-alpine");
        assert!(script.contains("NGINX_VERSION_PLACEHOLDER"));
        assert!(script.contains("TIMESTAMP_PLACEHOLDER"));
        assert!(script.contains(r"sed 's/.*nginx\/\([^[:space:]]*\).*/\1/'"));
        assert!(!script.contains(IMAGE_TAG_TOKEN));
    }

    #[test]
    fn payload_whitespace_is_preserved() {
        let script = startup_script("1.27");
        assert_eq!(script.matches("\n      \n").count(), 3);
        assert!(script.contains("</html>\nEOF\n\n      # Replace placeholders"));
        assert!(script.starts_with("\n      echo \"Starting Nginx container...\"\n"));
        assert!(script.ends_with("      nginx -g 'daemon off;'\n    "));
    }

    #[test]
    fn tag_containing_the_token_is_not_expanded_twice() {
        let script = startup_script("{{IMAGE_TAG}}");
        assert_eq!(script.matches("{{IMAGE_TAG}}").count(), 1);
    }
}
