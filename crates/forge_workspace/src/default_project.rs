//! Built-in minimal project, written when a generation yields no files.

use forge_artifact::FileArtifact;
use serde_json::json;

/// Artifact set for the default project: a runnable vite shell.
pub fn default_artifacts() -> Vec<FileArtifact> {
    vec![
        FileArtifact::new("vite.config.js", VITE_CONFIG),
        FileArtifact::new("package.json", package_json()),
        FileArtifact::new("index.html", INDEX_HTML),
    ]
}

const VITE_CONFIG: &str = r#"import { defineConfig } from 'vite';
import react from '@vitejs/plugin-react';

export default defineConfig({
  plugins: [react()],
  server: {
    host: true,
    port: 5173,
    strictPort: true
  }
});"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Fallback</title>
</head>
<body>
  <div id="root"></div>
  <script type="module" src="/src/main.tsx"></script>
</body>
</html>"#;

fn package_json() -> String {
    let manifest = json!({
        "name": "fallback-app",
        "private": true,
        "type": "module",
        "scripts": { "dev": "vite" },
        "dependencies": {
            "react": "^18.2.0",
            "react-dom": "^18.2.0"
        },
        "devDependencies": {
            "@vitejs/plugin-react": "^4.2.1",
            "vite": "^5.0.0"
        }
    });
    serde_json::to_string_pretty(&manifest).expect("static manifest serializes")
}
