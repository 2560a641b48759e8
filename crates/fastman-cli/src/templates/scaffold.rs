//! Python sources written by the `make:*` commands.
//!
//! Every template is rendered with `RenderContext::for_name`, so `snake`,
//! `pascal` and `plural` are always bound.

pub const FEATURE_MODEL: &str = r#""""Database model for {{pascal}}"""
from sqlalchemy import Column, Integer, String, DateTime
from sqlalchemy.sql import func
from app.core.database import Base


class {{pascal}}(Base):
    """{{pascal}} model"""
    __tablename__ = "{{plural}}"

    id = Column(Integer, primary_key=True, index=True)
    name = Column(String(255), nullable=False)
    created_at = Column(DateTime(timezone=True), server_default=func.now())
    updated_at = Column(DateTime(timezone=True), onupdate=func.now())

    def __repr__(self):
        return f"<{{pascal}}(id={self.id}, name={self.name})>"
"#;

pub const FEATURE_SCHEMAS: &str = r#""""Pydantic schemas for {{pascal}}"""
from pydantic import BaseModel, Field
from datetime import datetime
from typing import Optional


class {{pascal}}Base(BaseModel):
    """Base schema with common attributes"""
    name: str = Field(..., min_length=1, max_length=255)


class {{pascal}}Create({{pascal}}Base):
    """Schema for creating a {{pascal}}"""
    pass


class {{pascal}}Update(BaseModel):
    """Schema for updating a {{pascal}}"""
    name: Optional[str] = Field(None, min_length=1, max_length=255)


class {{pascal}}Read({{pascal}}Base):
    """Schema for reading a {{pascal}}"""
    id: int
    created_at: datetime
    updated_at: Optional[datetime] = None

    class Config:
        from_attributes = True
"#;

pub const FEATURE_SERVICE: &str = r#""""Business logic for {{pascal}}"""
from sqlalchemy.orm import Session
from typing import List, Optional
from . import models, schemas


class {{pascal}}Service:
    """Service layer for {{pascal}} operations"""

    @staticmethod
    def get_all(db: Session, skip: int = 0, limit: int = 100) -> List[models.{{pascal}}]:
        """Get all {{plural}}"""
        return db.query(models.{{pascal}}).offset(skip).limit(limit).all()

    @staticmethod
    def get_by_id(db: Session, id: int) -> Optional[models.{{pascal}}]:
        """Get {{snake}} by ID"""
        return db.query(models.{{pascal}}).filter(models.{{pascal}}.id == id).first()

    @staticmethod
    def create(db: Session, data: schemas.{{pascal}}Create) -> models.{{pascal}}:
        """Create new {{snake}}"""
        obj = models.{{pascal}}(**data.model_dump())
        db.add(obj)
        db.commit()
        db.refresh(obj)
        return obj

    @staticmethod
    def update(db: Session, id: int, data: schemas.{{pascal}}Update) -> Optional[models.{{pascal}}]:
        """Update existing {{snake}}"""
        obj = db.query(models.{{pascal}}).filter(models.{{pascal}}.id == id).first()
        if not obj:
            return None

        for key, value in data.model_dump(exclude_unset=True).items():
            setattr(obj, key, value)

        db.commit()
        db.refresh(obj)
        return obj

    @staticmethod
    def delete(db: Session, id: int) -> bool:
        """Delete {{snake}}"""
        obj = db.query(models.{{pascal}}).filter(models.{{pascal}}.id == id).first()
        if not obj:
            return False

        db.delete(obj)
        db.commit()
        return True
"#;

// Sync handlers: SQLAlchemy sessions block, so FastAPI runs them in its pool.
pub const FEATURE_ROUTER_CRUD: &str = r#""""API routes for {{pascal}}"""
from fastapi import APIRouter, Depends, HTTPException, status
from sqlalchemy.orm import Session
from typing import List
from app.core.database import get_db
from . import service, schemas


router = APIRouter(
    prefix="/{{plural}}",
    tags=["{{pascal}}"]
)


@router.get("/", response_model=List[schemas.{{pascal}}Read])
def list_{{plural}}(
    skip: int = 0,
    limit: int = 100,
    db: Session = Depends(get_db)
):
    """Get all {{plural}}"""
    return service.{{pascal}}Service.get_all(db, skip=skip, limit=limit)


@router.get("/{id}", response_model=schemas.{{pascal}}Read)
def get_{{snake}}(id: int, db: Session = Depends(get_db)):
    """Get {{snake}} by ID"""
    obj = service.{{pascal}}Service.get_by_id(db, id)
    if not obj:
        raise HTTPException(
            status_code=status.HTTP_404_NOT_FOUND,
            detail="{{pascal}} not found"
        )
    return obj


@router.post("/", response_model=schemas.{{pascal}}Read, status_code=status.HTTP_201_CREATED)
def create_{{snake}}(
    data: schemas.{{pascal}}Create,
    db: Session = Depends(get_db)
):
    """Create new {{snake}}"""
    return service.{{pascal}}Service.create(db, data)


@router.put("/{id}", response_model=schemas.{{pascal}}Read)
def update_{{snake}}(
    id: int,
    data: schemas.{{pascal}}Update,
    db: Session = Depends(get_db)
):
    """Update {{snake}}"""
    obj = service.{{pascal}}Service.update(db, id, data)
    if not obj:
        raise HTTPException(
            status_code=status.HTTP_404_NOT_FOUND,
            detail="{{pascal}} not found"
        )
    return obj


@router.delete("/{id}", status_code=status.HTTP_204_NO_CONTENT)
def delete_{{snake}}(id: int, db: Session = Depends(get_db)):
    """Delete {{snake}}"""
    if not service.{{pascal}}Service.delete(db, id):
        raise HTTPException(
            status_code=status.HTTP_404_NOT_FOUND,
            detail="{{pascal}} not found"
        )
"#;

pub const FEATURE_ROUTER_BASIC: &str = r#""""API routes for {{pascal}}"""
from fastapi import APIRouter, Depends
from sqlalchemy.orm import Session
from typing import List
from app.core.database import get_db
from . import service, schemas


router = APIRouter(
    prefix="/{{plural}}",
    tags=["{{pascal}}"]
)


@router.get("/", response_model=List[schemas.{{pascal}}Read])
def list_{{plural}}(db: Session = Depends(get_db)):
    """Get all {{plural}}"""
    return service.{{pascal}}Service.get_all(db)
"#;

/// Extra binding: `table`.
pub const MODEL: &str = r#""""Database model for {{pascal}}"""
from sqlalchemy import Column, Integer, String, DateTime, Boolean, Text
from sqlalchemy.sql import func
from app.core.database import Base


class {{pascal}}(Base):
    """{{pascal}} model"""
    __tablename__ = "{{table}}"

    id = Column(Integer, primary_key=True, index=True)
    name = Column(String(255), nullable=False, index=True)
    description = Column(Text, nullable=True)
    is_active = Column(Boolean, default=True)
    created_at = Column(DateTime(timezone=True), server_default=func.now())
    updated_at = Column(DateTime(timezone=True), onupdate=func.now())

    def __repr__(self):
        return f"<{{pascal}}(id={self.id}, name={self.name})>"
"#;

pub const SERVICE: &str = r#""""Business logic service for {{pascal}}"""
from typing import Any, Dict
import logging

logger = logging.getLogger(__name__)


class {{pascal}}Service:
    """{{pascal}} service layer"""

    def __init__(self):
        """Initialize service"""
        pass

    def execute(self, data: Dict[str, Any]) -> Dict[str, Any]:
        """
        Main service method

        Args:
            data: Input data

        Returns:
            Result dictionary
        """
        logger.info("{{pascal}}Service.execute called")

        # TODO: Implement business logic

        return {"status": "success", "data": data}

    def validate(self, data: Dict[str, Any]) -> bool:
        """
        Validate input data

        Args:
            data: Data to validate

        Returns:
            True if valid
        """
        # TODO: Implement validation
        return True
"#;

pub const SCHEMA: &str = r#""""Pydantic schema for {{pascal}}"""
from pydantic import BaseModel, Field
from typing import Optional
from datetime import datetime


class {{pascal}}Base(BaseModel):
    """Base schema"""
    name: str = Field(..., min_length=1)
    description: Optional[str] = None


class {{pascal}}Create({{pascal}}Base):
    """Creation schema"""
    pass


class {{pascal}}Update(BaseModel):
    """Update schema"""
    name: Optional[str] = Field(None, min_length=1)


class {{pascal}}Read({{pascal}}Base):
    """Read schema"""
    id: int
    created_at: datetime

    class Config:
        from_attributes = True
"#;

/// Plugin manifest for a custom command. Extra bindings: `python`, `dir`.
pub const COMMAND_MANIFEST: &str = r#"# Registered by Fastman at start-up: `fastman custom:{{snake}}`
signature = "custom:{{snake}} {--option=}"
description = "Custom {{snake}} command"
run = ["{{python}}", "{{dir}}/{{snake}}.py"]
"#;

pub const COMMAND_SCRIPT: &str = r#""""Custom command: {{pascal}}"""
import argparse
import sys


def main(argv: list[str]) -> int:
    parser = argparse.ArgumentParser(prog="fastman custom:{{snake}}")
    parser.add_argument("--option", default="default")
    args = parser.parse_args(argv)

    print(f"Running {{snake}} command with option={args.option}")

    # TODO: Implement command logic

    print("{{pascal}} command completed!")
    return 0


if __name__ == "__main__":
    sys.exit(main(sys.argv[1:]))
"#;

pub const CONTROLLER: &str = r#""""{{pascal}} controller"""
from fastapi import Request


class {{pascal}}Controller:
    """Controller for {{name}}"""

    def index(self, request: Request):
        return {"message": "Hello from {{pascal}}Controller"}
"#;

pub const REPOSITORY: &str = r#""""Repository for {{pascal}} data access"""
from sqlalchemy.orm import Session
from typing import Any, Dict, List, Optional
from app.models.{{snake}} import {{pascal}}


class {{pascal}}Repository:
    """Data access layer for {{pascal}}"""

    def __init__(self, db: Session):
        self.db = db

    def get_all(self, skip: int = 0, limit: int = 100) -> List[{{pascal}}]:
        return self.db.query({{pascal}}).offset(skip).limit(limit).all()

    def get_by_id(self, id: int) -> Optional[{{pascal}}]:
        return self.db.query({{pascal}}).filter({{pascal}}.id == id).first()

    def create(self, data: Dict[str, Any]) -> {{pascal}}:
        obj = {{pascal}}(**data)
        self.db.add(obj)
        self.db.commit()
        self.db.refresh(obj)
        return obj

    def update(self, id: int, data: Dict[str, Any]) -> Optional[{{pascal}}]:
        obj = self.get_by_id(id)
        if not obj:
            return None

        for key, value in data.items():
            setattr(obj, key, value)

        self.db.commit()
        self.db.refresh(obj)
        return obj

    def delete(self, id: int) -> bool:
        obj = self.get_by_id(id)
        if not obj:
            return False

        self.db.delete(obj)
        self.db.commit()
        return True

    def find_by(self, **filters) -> List[{{pascal}}]:
        query = self.db.query({{pascal}})
        for key, value in filters.items():
            if hasattr({{pascal}}, key):
                query = query.filter(getattr({{pascal}}, key) == value)
        return query.all()
"#;

pub const MIDDLEWARE: &str = r#""""HTTP middleware for {{pascal}}"""
from starlette.middleware.base import BaseHTTPMiddleware
from starlette.requests import Request
from starlette.responses import Response
import logging
import time

logger = logging.getLogger(__name__)


class {{pascal}}Middleware(BaseHTTPMiddleware):
    """{{pascal}} middleware"""

    async def dispatch(self, request: Request, call_next) -> Response:
        start_time = time.time()
        logger.info(f"{request.method} {request.url.path}")

        response = await call_next(request)

        process_time = time.time() - start_time
        response.headers["X-Process-Time"] = str(process_time)
        logger.info(f"Completed in {process_time:.4f}s")
        return response
"#;

pub const DEPENDENCY: &str = r#""""FastAPI dependency for {{pascal}}"""
from fastapi import HTTPException, status
from typing import Optional
import logging

logger = logging.getLogger(__name__)


async def get_{{snake}}() -> str:
    """Resolve the {{snake}} dependency"""
    try:
        logger.info("Resolving {{snake}} dependency")
        return "{{snake}}_value"
    except Exception as e:
        logger.error(f"Failed to resolve {{snake}}: {e}")
        raise HTTPException(
            status_code=status.HTTP_500_INTERNAL_SERVER_ERROR,
            detail="Failed to resolve dependency",
        )


class {{pascal}}Dependency:
    """Class-based dependency for {{pascal}}"""

    def __init__(self, param: Optional[str] = None):
        self.param = param

    async def __call__(self) -> str:
        logger.info(f"{{pascal}}Dependency called with param={self.param}")
        return "result"
"#;

/// Extra binding: `exception`, the class name with an `Exception` suffix.
pub const EXCEPTION: &str = r#""""Custom exception: {{exception}}"""
from fastapi import HTTPException, status


class {{exception}}(HTTPException):
    """Custom exception for {{snake}} errors"""

    def __init__(self, detail: str = "An error occurred", status_code: int = status.HTTP_400_BAD_REQUEST):
        super().__init__(status_code=status_code, detail=detail)


class {{exception}}NotFound(HTTPException):
    """Resource not found"""

    def __init__(self, detail: str = "Resource not found"):
        super().__init__(status_code=status.HTTP_404_NOT_FOUND, detail=detail)


class {{exception}}Forbidden(HTTPException):
    """Forbidden access"""

    def __init__(self, detail: str = "Forbidden"):
        super().__init__(status_code=status.HTTP_403_FORBIDDEN, detail=detail)
"#;

pub const API_REST: &str = r#""""REST API endpoints for {{pascal}}"""
from fastapi import APIRouter
from typing import List
from pydantic import BaseModel


router = APIRouter(
    prefix="/api/{{snake}}",
    tags=["{{pascal}} API"]
)


class {{pascal}}Response(BaseModel):
    id: int
    name: str


@router.get("/", response_model=List[{{pascal}}Response])
def list_{{plural}}():
    """List all {{plural}}"""
    return []


@router.get("/{id}", response_model={{pascal}}Response)
def get_{{snake}}(id: int):
    """Get {{snake}} by ID"""
    return {{pascal}}Response(id=id, name="Example")
"#;

pub const API_GRAPHQL: &str = r#""""GraphQL schema for {{pascal}}"""
import strawberry
from typing import List


@strawberry.type
class {{pascal}}Type:
    id: int
    name: str


@strawberry.type
class Query:
    @strawberry.field
    def {{plural}}(self) -> List[{{pascal}}Type]:
        """Get all {{plural}}"""
        return []

    @strawberry.field
    def {{snake}}(self, id: int) -> {{pascal}}Type:
        """Get {{snake}} by ID"""
        return {{pascal}}Type(id=id, name="Example")


@strawberry.type
class Mutation:
    @strawberry.mutation
    def create_{{snake}}(self, name: str) -> {{pascal}}Type:
        """Create a new {{snake}}"""
        return {{pascal}}Type(id=1, name=name)
"#;

pub const WEBSOCKET_MANAGER: &str = r#""""WebSocket connection manager for {{pascal}}"""
from fastapi import WebSocket
from typing import List
import logging

logger = logging.getLogger(__name__)


class {{pascal}}ConnectionManager:
    """Tracks open WebSocket connections"""

    def __init__(self):
        self.active_connections: List[WebSocket] = []

    async def connect(self, websocket: WebSocket):
        await websocket.accept()
        self.active_connections.append(websocket)
        logger.info(f"New connection. Total: {len(self.active_connections)}")

    def disconnect(self, websocket: WebSocket):
        self.active_connections.remove(websocket)
        logger.info(f"Connection closed. Total: {len(self.active_connections)}")

    async def send_personal(self, message: str, websocket: WebSocket):
        await websocket.send_text(message)

    async def broadcast(self, message: str):
        for connection in self.active_connections:
            try:
                await connection.send_text(message)
            except Exception as e:
                logger.error(f"Failed to send message: {e}")


manager = {{pascal}}ConnectionManager()
"#;

pub const WEBSOCKET_ROUTER: &str = r#""""WebSocket routes for {{pascal}}"""
from fastapi import APIRouter, WebSocket, WebSocketDisconnect
from .manager import manager
import logging

logger = logging.getLogger(__name__)

router = APIRouter(tags=["{{pascal}} WebSocket"])


@router.websocket("/ws/{{snake}}")
async def {{snake}}_endpoint(websocket: WebSocket):
    await manager.connect(websocket)
    try:
        while True:
            data = await websocket.receive_text()
            logger.info(f"Received: {data}")
            await manager.send_personal(f"Echo: {data}", websocket)
            await manager.broadcast(f"Broadcast: {data}")
    except WebSocketDisconnect:
        manager.disconnect(websocket)
        await manager.broadcast("Client disconnected")
    except Exception as e:
        logger.error(f"WebSocket error: {e}")
        manager.disconnect(websocket)
"#;
