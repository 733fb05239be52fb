// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Package index fixtures.

/// Host identifier used by the fixtures.
pub const HOST_ID: &str = "github.com/caddyserver/caddy/v2";

/// Releases for every entry of the built-in catalog plus a few shared
/// transitive dependencies.
pub const CATALOG_INDEX: &str = r#"
[[package]]
name = "github.com/caddyserver/caddy/v2"
version = "v2.7.6"
published = "2023-12-01T18:00:00Z"
dependencies = { "github.com/klauspost/compress" = "^1.17", "golang.org/x/net" = ">=0.19" }

[[package]]
name = "github.com/caddyserver/caddy/v2"
version = "v2.8.4"
published = "2024-05-30T17:23:04Z"
dependencies = { "github.com/klauspost/compress" = "^1.17", "golang.org/x/net" = ">=0.25" }

[[package]]
name = "github.com/klauspost/compress"
version = "v1.17.8"

[[package]]
name = "github.com/klauspost/compress"
version = "v1.17.9"

[[package]]
name = "golang.org/x/net"
version = "v0.25.0"

[[package]]
name = "golang.org/x/net"
version = "v0.26.0"

[[package]]
name = "github.com/caddyserver/forwardproxy"
version = "v0.0.0-20240124153525-38e8f2a8bc50"
revision = "38e8f2a8bc50"
published = "2024-01-24T15:35:25Z"
capabilities = ["http.handlers.forward_proxy"]
dependencies = { "github.com/caddyserver/caddy/v2" = "^2.7", "golang.org/x/net" = "*" }

[[package]]
name = "github.com/klzgrad/forwardproxy"
version = "v0.0.0-20240911154043-1e1d1e2e5d06"
revision = "1e1d1e2e5d06"
published = "2024-09-11T15:40:43Z"
capabilities = ["http.handlers.forward_proxy"]
dependencies = { "github.com/caddyserver/caddy/v2" = "^2.8" }

[[package]]
name = "github.com/imgk/caddy-trojan"
version = "v0.0.0-20240412063322-5e09ab7f61a1"
revision = "5e09ab7f61a1"
published = "2024-04-12T06:33:22Z"
capabilities = ["trojan", "http.handlers.trojan", "caddy.listeners.trojan"]
dependencies = { "github.com/caddyserver/caddy/v2" = "^2.7" }

[[package]]
name = "github.com/mholt/caddy-l4"
version = "v0.0.0-20240812213304-afa78d72257b"
revision = "afa78d72257b"
published = "2024-08-12T21:33:04Z"
capabilities = ["layer4", "caddy.listeners.layer4"]
dependencies = { "github.com/caddyserver/caddy/v2" = "^2.8", "golang.org/x/net" = ">=0.26" }

[[package]]
name = "github.com/fvbommel/caddy-combine-ip-ranges"
version = "v0.0.1"
published = "2023-06-10T09:00:00Z"
capabilities = ["http.ip_sources.combine"]
dependencies = { "github.com/caddyserver/caddy/v2" = "^2.7" }

[[package]]
name = "github.com/LeenHawk/caddy-edgeone-ip"
version = "v0.1.2"
published = "2024-07-01T02:00:00Z"
capabilities = ["http.ip_sources.edgeone"]
dependencies = { "github.com/caddyserver/caddy/v2" = "^2.7" }

[[package]]
name = "github.com/monobilisim/caddy-ip-list"
version = "v1.0.1"
published = "2024-02-20T10:00:00Z"
capabilities = ["http.ip_sources.list"]
dependencies = { "github.com/caddyserver/caddy/v2" = "^2.7" }

[[package]]
name = "github.com/WeidiDeng/caddy-cloudflare-ip"
version = "v0.0.0-20231130002422-f53b62aa13cb"
revision = "f53b62aa13cb"
published = "2023-11-30T00:24:22Z"
capabilities = ["http.ip_sources.cloudflare"]
dependencies = { "github.com/caddyserver/caddy/v2" = "^2.7" }

[[package]]
name = "github.com/xcaddyplugins/caddy-trusted-cloudfront"
version = "v1.0.3"
published = "2024-03-15T12:00:00Z"
capabilities = ["http.ip_sources.cloudfront"]
dependencies = { "github.com/caddyserver/caddy/v2" = "^2.7" }
"#;

