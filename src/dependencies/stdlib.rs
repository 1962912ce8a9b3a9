//! Fixed reference sets used by the classifier and the technology stack.
//!
//! Membership is case-sensitive. The sets are intentionally finite; names
//! outside them fall through to the next bucket.

use crate::core::Language;

pub static PYTHON_STANDARD: &[&str] = &[
    "__future__", "abc", "argparse", "array", "ast", "asyncio", "base64", "bisect",
    "builtins", "calendar", "collections", "concurrent", "configparser", "contextlib",
    "copy", "csv", "ctypes", "dataclasses", "datetime", "decimal", "difflib", "email",
    "enum", "errno", "fnmatch", "fractions", "functools", "gc", "getpass", "glob",
    "gzip", "hashlib", "heapq", "hmac", "html", "http", "importlib", "inspect", "io",
    "ipaddress", "itertools", "json", "logging", "math", "multiprocessing", "operator",
    "os", "pathlib", "pickle", "platform", "pprint", "queue", "random", "re", "secrets",
    "select", "shlex", "shutil", "signal", "socket", "sqlite3", "ssl", "stat",
    "statistics", "string", "struct", "subprocess", "sys", "tempfile", "textwrap",
    "threading", "time", "timeit", "traceback", "types", "typing", "unittest", "urllib",
    "uuid", "warnings", "weakref", "xml", "zipfile", "zlib",
];

pub static PYTHON_EXTERNAL: &[&str] = &[
    "aiohttp", "boto3", "celery", "click", "django", "dotenv", "fastapi", "flask",
    "httpx", "jinja2", "matplotlib", "numpy", "openai", "pandas", "psycopg2", "pydantic",
    "pytest", "redis", "requests", "scipy", "sklearn", "sqlalchemy", "starlette",
    "torch", "uvicorn", "yaml",
];

pub static NODE_STANDARD: &[&str] = &[
    "assert", "buffer", "child_process", "cluster", "crypto", "dgram", "dns", "events",
    "fs", "http", "http2", "https", "net", "os", "path", "perf_hooks", "process",
    "querystring", "readline", "stream", "string_decoder", "timers", "tls", "url",
    "util", "v8", "vm", "worker_threads", "zlib",
];

pub static NODE_EXTERNAL: &[&str] = &[
    "@angular/core", "@nestjs/common", "@tanstack/react-query", "angular", "axios",
    "express", "jest", "lodash", "moment", "next", "react", "react-dom", "redux",
    "svelte", "tailwindcss", "typescript", "vite", "vue", "webpack", "zod",
];

pub static RUST_STANDARD: &[&str] = &["alloc", "core", "proc_macro", "std", "test"];

pub static RUST_EXTERNAL: &[&str] = &[
    "actix_web", "anyhow", "axum", "chrono", "clap", "log", "once_cell", "rand", "rayon",
    "regex", "reqwest", "rocket", "serde", "serde_json", "thiserror", "tokio", "tracing",
];

pub static GO_STANDARD: &[&str] = &[
    "bufio", "bytes", "context", "crypto", "database", "encoding", "errors", "flag",
    "fmt", "io", "log", "math", "net", "os", "path", "reflect", "regexp", "runtime",
    "sort", "strconv", "strings", "sync", "testing", "time", "unicode",
];

pub static GO_EXTERNAL: &[&str] = &[
    "github.com/gin-gonic/gin",
    "github.com/go-chi/chi",
    "github.com/gorilla/mux",
    "github.com/labstack/echo",
    "github.com/sirupsen/logrus",
    "github.com/spf13/cobra",
    "github.com/stretchr/testify",
    "go.uber.org/zap",
    "gorm.io/gorm",
];

/// Framework names recognized in the technology stack. Anything else that
/// is not a standard library lands in `tools`.
pub static KNOWN_FRAMEWORKS: &[&str] = &[
    "fastapi", "flask", "django", "starlette",
    "react", "next", "vue", "angular", "@angular/core", "svelte", "express",
    "@nestjs/common", "tailwindcss",
    "tokio", "actix_web", "actix-web", "axum", "rocket",
    "github.com/gin-gonic/gin", "github.com/labstack/echo",
    "spring", "rails",
];

/// Per-language (standard, external) reference sets.
static LIBRARY_SETS: &[(Language, &[&str], &[&str])] = &[
    (Language::Python, PYTHON_STANDARD, PYTHON_EXTERNAL),
    (Language::JavaScript, NODE_STANDARD, NODE_EXTERNAL),
    (Language::TypeScript, NODE_STANDARD, NODE_EXTERNAL),
    (Language::Json, &[], NODE_EXTERNAL),
    (Language::Rust, RUST_STANDARD, RUST_EXTERNAL),
    (Language::Go, GO_STANDARD, GO_EXTERNAL),
];

pub fn library_sets(language: Language) -> (&'static [&'static str], &'static [&'static str]) {
    LIBRARY_SETS
        .iter()
        .find(|(lang, _, _)| *lang == language)
        .map(|(_, standard, external)| (*standard, *external))
        .unwrap_or((&[], &[]))
}

pub fn is_known_framework(token: &str) -> bool {
    KNOWN_FRAMEWORKS.contains(&token)
}
