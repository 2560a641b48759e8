//! Files written by `fastman new` and `fastman init`.
//!
//! Bindings: `project_name`, `version`, `secret_key`, plus the README keys
//! listed on [`README`].

pub const MAIN_APP: &str = r#""""
{{project_name}} - FastAPI Application
Generated by Fastman v{{version}}
"""
from fastapi import FastAPI
from fastapi.middleware.cors import CORSMiddleware
from app.core.config import settings
from app.core.logging import setup_logging

# Setup logging
setup_logging()

# Initialize FastAPI
app = FastAPI(
    title=settings.PROJECT_NAME,
    version=settings.VERSION,
    docs_url="/docs" if settings.DEBUG else None,
    redoc_url="/redoc" if settings.DEBUG else None
)

# CORS
app.add_middleware(
    CORSMiddleware,
    allow_origins=settings.ALLOWED_HOSTS,
    allow_credentials=True,
    allow_methods=["*"],
    allow_headers=["*"],
)

# Health check
@app.get("/health")
async def health_check():
    return {
        "status": "ok",
        "version": settings.VERSION,
        "environment": settings.ENVIRONMENT
    }

# Auto-discover and include routers
from app.core.discovery import discover_routers
discover_routers(app)
"#;

pub const CONFIG: &str = r#""""Application configuration"""
from pydantic_settings import BaseSettings
from typing import List, Optional

class Settings(BaseSettings):
    """Application settings"""

    # Project
    PROJECT_NAME: str = "{{project_name}}"
    VERSION: str = "1.0.0"
    ENVIRONMENT: str = "development"
    DEBUG: bool = True

    # Security
    SECRET_KEY: str = "{{secret_key}}"
    ALLOWED_HOSTS: List[str] = ["*"]

    # Database
    DATABASE_URL: Optional[str] = "sqlite:///./app.db"

    # API
    API_V1_PREFIX: str = "/api/v1"

    class Config:
        env_file = ".env"
        case_sensitive = True

settings = Settings()
"#;

pub const DATABASE_SQLITE: &str = r#""""Database configuration and session management"""
from sqlalchemy import create_engine
from sqlalchemy.orm import sessionmaker, declarative_base, Session
from typing import Generator
from app.core.config import settings

# Create engine
engine = create_engine(
    settings.DATABASE_URL,
    connect_args={"check_same_thread": False} if settings.DATABASE_URL.startswith("sqlite") else {},
    pool_pre_ping=True,
    echo=settings.DEBUG
)

# Session factory
SessionLocal = sessionmaker(
    autocommit=False,
    autoflush=False,
    bind=engine
)

# Base class for models
Base = declarative_base()

def get_db() -> Generator[Session, None, None]:
    """Dependency for database session"""
    db = SessionLocal()
    try:
        yield db
    finally:
        db.close()

def init_db():
    """Initialize database tables"""
    Base.metadata.create_all(bind=engine)
"#;

/// Pooled engine for server databases. Extra binding: `database_label`.
pub const DATABASE_SERVER: &str = r#""""{{database_label}} database configuration and session management"""
from sqlalchemy import create_engine
from sqlalchemy.orm import sessionmaker, declarative_base, Session
from typing import Generator
from app.core.config import settings

# Create engine with {{database_label}}-specific settings
engine = create_engine(
    settings.DATABASE_URL,
    pool_pre_ping=True,
    pool_size=10,
    max_overflow=20,
    pool_recycle=3600,
    echo=settings.DEBUG
)

# Session factory
SessionLocal = sessionmaker(
    autocommit=False,
    autoflush=False,
    bind=engine
)

# Base class for models
Base = declarative_base()

def get_db() -> Generator[Session, None, None]:
    """Dependency for database session"""
    db = SessionLocal()
    try:
        yield db
    finally:
        db.close()

def init_db():
    """Initialize database tables"""
    Base.metadata.create_all(bind=engine)
"#;

pub const LOGGING: &str = r#""""Logging configuration"""
import logging
import sys
from pathlib import Path

def setup_logging(log_level: str = "INFO"):
    """Setup application logging"""

    # Create logs directory
    log_dir = Path("logs")
    log_dir.mkdir(exist_ok=True)

    # Configure logging
    logging.basicConfig(
        level=getattr(logging, log_level),
        format='%(asctime)s - %(name)s - %(levelname)s - %(message)s',
        handlers=[
            logging.StreamHandler(sys.stdout),
            logging.FileHandler(log_dir / "app.log")
        ]
    )

    # Set third-party loggers to WARNING
    logging.getLogger("uvicorn").setLevel(logging.WARNING)
    logging.getLogger("sqlalchemy").setLevel(logging.WARNING)
"#;

pub const DISCOVERY: &str = r#""""Auto-discovery of routers and features"""
import importlib
from pathlib import Path
from fastapi import FastAPI
import logging

logger = logging.getLogger(__name__)

def _include_routers(app: FastAPI, package: str):
    base = Path("app") / package
    if not base.exists():
        return

    for item in sorted(base.iterdir()):
        if not item.is_dir() or item.name.startswith("_"):
            continue
        if not (item / "router.py").exists():
            continue
        try:
            module = importlib.import_module(f"app.{package}.{item.name}.router")
            if hasattr(module, "router"):
                app.include_router(module.router)
                logger.info(f"Registered {package} router: {item.name}")
        except Exception as e:
            logger.error(f"Failed to load {package} router {item.name}: {e}")

def discover_routers(app: FastAPI):
    """Discover and register all routers"""
    _include_routers(app, "features")
    _include_routers(app, "api")
"#;

pub const ALEMBIC_ENV: &str = r#""""Alembic environment configuration"""
from logging.config import fileConfig
from sqlalchemy import engine_from_config, pool
from alembic import context
import sys
from pathlib import Path

# Add project root to path
sys.path.append(str(Path(__file__).parents[1]))

from app.core.config import settings
from app.core.database import Base

# Import all models here
# This ensures they're registered with Base.metadata
from app.models import *

config = context.config
config.set_main_option("sqlalchemy.url", settings.DATABASE_URL)

if config.config_file_name is not None:
    fileConfig(config.config_file_name)

target_metadata = Base.metadata

def run_migrations_offline():
    """Run migrations in 'offline' mode"""
    url = config.get_main_option("sqlalchemy.url")
    context.configure(
        url=url,
        target_metadata=target_metadata,
        literal_binds=True,
        dialect_opts={"paramstyle": "named"},
    )

    with context.begin_transaction():
        context.run_migrations()

def run_migrations_online():
    """Run migrations in 'online' mode"""
    connectable = engine_from_config(
        config.get_section(config.config_ini_section),
        prefix="sqlalchemy.",
        poolclass=pool.NullPool,
    )

    with connectable.connect() as connection:
        context.configure(
            connection=connection,
            target_metadata=target_metadata
        )

        with context.begin_transaction():
            context.run_migrations()

if context.is_offline_mode():
    run_migrations_offline()
else:
    run_migrations_online()
"#;

pub const ALEMBIC_INI: &str = r#"[alembic]
script_location = alembic
prepend_sys_path = .
version_path_separator = os

[loggers]
keys = root,sqlalchemy,alembic

[handlers]
keys = console

[formatters]
keys = generic

[logger_root]
level = WARN
handlers = console

[logger_sqlalchemy]
level = WARN
handlers =
qualname = sqlalchemy.engine

[logger_alembic]
level = INFO
handlers =
qualname = alembic

[handler_console]
class = StreamHandler
args = (sys.stderr,)
level = NOTSET
formatter = generic

[formatter_generic]
format = %(levelname)-5.5s [%(name)s] %(message)s
"#;

/// Alembic's revision template; `make:migration` needs it to exist.
pub const ALEMBIC_SCRIPT_MAKO: &str = r#""""${message}

Revision ID: ${up_revision}
Revises: ${down_revision | comma,n}
Create Date: ${create_date}

"""
from alembic import op
import sqlalchemy as sa
${imports if imports else ""}

# revision identifiers, used by Alembic.
revision = ${repr(up_revision)}
down_revision = ${repr(down_revision)}
branch_labels = ${repr(branch_labels)}
depends_on = ${repr(depends_on)}


def upgrade() -> None:
    ${upgrades if upgrades else "pass"}


def downgrade() -> None:
    ${downgrades if downgrades else "pass"}
"#;

pub const GITIGNORE: &str = r#"# Python
__pycache__/
*.py[cod]
*$py.class
*.so
.Python
*.egg-info/
dist/
build/
*.egg

# Virtual Environment
.venv/
venv/
ENV/
env/

# IDEs
.vscode/
.idea/
*.swp
*.swo
*~

# Environment
.env
.env.local
.env.*.local

# Database
*.db
*.sqlite
*.sqlite3

# Logs
logs/
*.log

# Testing
.pytest_cache/
.coverage
htmlcov/

# OS
.DS_Store
Thumbs.db
"#;

pub const ENV_BASE: &str = r#"# Application
PROJECT_NAME={{project_name}}
ENVIRONMENT=development
DEBUG=true
SECRET_KEY={{secret_key}}

# API
API_V1_PREFIX=/api/v1
ALLOWED_HOSTS=["*"]
"#;

pub const ENV_SQLITE: &str = r#"
# Database
DATABASE_URL=sqlite:///./app.db
"#;

pub const ENV_POSTGRESQL: &str = r#"
# Database (PostgreSQL)
# IMPORTANT: Replace placeholders with your actual database credentials
DATABASE_URL=postgresql://<YOUR_USER>:<YOUR_PASSWORD>@localhost:5432/{{project_name}}
POSTGRES_USER=<YOUR_USER>
POSTGRES_PASSWORD=<YOUR_PASSWORD>
POSTGRES_DB={{project_name}}
"#;

pub const ENV_MYSQL: &str = r#"
# Database (MySQL)
# IMPORTANT: Replace placeholders with your actual database credentials
DATABASE_URL=mysql+pymysql://<YOUR_USER>:<YOUR_PASSWORD>@localhost:3306/{{project_name}}
MYSQL_USER=<YOUR_USER>
MYSQL_PASSWORD=<YOUR_PASSWORD>
MYSQL_DATABASE={{project_name}}
"#;

/// `fastman init` writes this when `.env` is missing.
pub const ENV_INIT: &str = "# Environment variables\n";

/// Project-level Fastman settings, written by `init`.
pub const FASTMAN_TOML: &str = r#"# Fastman project settings

[parser]
# Accept `--port 9000` as well as `--port=9000`
separated_options = false

[plugins]
enabled = true
dirs = ["app/console/commands"]
"#;

/// Extra bindings: `pattern`, `pattern_description`, `package_manager`,
/// `activate`, `install_command`, `structure`.
pub const README: &str = r#"# {{project_name}}

FastAPI project generated with Fastman v{{version}}

**Pattern**: {{pattern}} - {{pattern_description}}
**Package Manager**: {{package_manager}}

## Getting Started

```bash
cd {{project_name}}

{{activate}}

# Install dependencies
{{install_command}}

# Run development server
fastman serve

# View available commands
fastman list
```

## Project Structure

```
{{project_name}}/
├── app/
│   ├── core/          # Core configuration and utilities
{{structure}}
├── tests/             # Test files
├── alembic/           # Database migrations
└── logs/              # Application logs
```

## Documentation

- API Documentation: http://localhost:8000/docs
"#;

pub const STRUCTURE_FEATURE: &str = "\
│   ├── features/      # Feature modules (vertical slices)
│   ├── api/           # Lightweight API endpoints
│   └── models/        # Database models";

pub const STRUCTURE_API: &str = "\
│   ├── api/           # API endpoints
│   ├── schemas/       # Pydantic schemas
│   └── models/        # Database models";

pub const STRUCTURE_LAYER: &str = "\
│   ├── controllers/   # Request handlers
│   ├── services/      # Business logic
│   ├── repositories/  # Data access layer
│   ├── models/        # Database models
│   └── schemas/       # Pydantic schemas";
