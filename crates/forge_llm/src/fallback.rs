//! Static substitute payload used when acquisition is exhausted.
//!
//! Shaped exactly like a backend response so it flows through the same
//! parse-and-materialize path as real output.

pub const FALLBACK_RESPONSE: &str = r#"<file name="vite.config.js">
import { defineConfig } from 'vite';
import react from '@vitejs/plugin-react';

export default defineConfig({
  plugins: [react()],
  server: {
    host: true,
    port: 5173,
    strictPort: true
  }
});
</file>
<file name="package.json">
{
  "name": "fallback-app",
  "private": true,
  "type": "module",
  "scripts": {
    "dev": "vite"
  },
  "dependencies": {
    "react": "^18.2.0",
    "react-dom": "^18.2.0"
  },
  "devDependencies": {
    "@vitejs/plugin-react": "^4.2.1",
    "vite": "^5.0.0"
  }
}
</file>
<file name="index.html">
<!DOCTYPE html>
<html>
<head>
  <title>Fallback</title>
</head>
<body>
  <div id="root"></div>
  <script type="module" src="/src/main.tsx"></script>
</body>
</html>
</file>"#;
